//! Persistence sinks: where a store's container is loaded from and flushed to.

use super::StoreError;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Backing storage for one collection
///
/// A store reads its sink once at startup and hands it the whole serialized
/// container after every mutation.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Read the persisted document
    async fn load(&self) -> Result<Vec<u8>, StoreError>;

    /// Overwrite the persisted document with `contents`
    async fn flush(&self, contents: &[u8]) -> Result<(), StoreError>;

    /// Human readable location, used in logs
    fn describe(&self) -> String;
}

/// A JSON file on disk
///
/// Flushes write `<path>.tmp` and rename it over the target, so a crash
/// mid-write leaves the previous file intact.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let ext = self
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("json");
        self.path.with_extension(format!("{ext}.tmp"))
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn load(&self) -> Result<Vec<u8>, StoreError> {
        tokio::fs::read(&self.path)
            .await
            .map_err(|e| StoreError::read(self.describe(), e))
    }

    async fn flush(&self, contents: &[u8]) -> Result<(), StoreError> {
        let tmp = self.tmp_path();
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| StoreError::write(self.describe(), e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::write(self.describe(), e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-memory sink for tests
///
/// Keeps the last flushed document, counts flushes and can be armed to fail
/// the next `n` flushes.
#[derive(Debug, Default)]
pub struct MemorySink {
    contents: Mutex<Vec<u8>>,
    flushes: AtomicUsize,
    failures: AtomicUsize,
}

impl MemorySink {
    /// A sink whose document starts as `contents`
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            contents: Mutex::new(contents.into()),
            flushes: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
        }
    }

    /// A sink seeded with the JSON encoding of `value`
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self::new(value.to_string())
    }

    /// Make the next `n` flushes fail
    pub fn fail_next(&self, n: usize) {
        self.failures.store(n, Ordering::SeqCst);
    }

    /// Number of successful flushes so far
    pub fn flush_count(&self) -> usize {
        self.flushes.load(Ordering::SeqCst)
    }

    /// The current document
    pub fn contents(&self) -> Vec<u8> {
        self.contents
            .lock()
            .map(|c| c.clone())
            .unwrap_or_default()
    }

    /// The current document parsed as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.contents()).unwrap_or(serde_json::Value::Null)
    }
}

#[async_trait]
impl Sink for MemorySink {
    async fn load(&self) -> Result<Vec<u8>, StoreError> {
        Ok(self.contents())
    }

    async fn flush(&self, contents: &[u8]) -> Result<(), StoreError> {
        let armed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if armed {
            return Err(StoreError::Write {
                location: self.describe(),
                message: "simulated write failure".to_string(),
            });
        }

        if let Ok(mut current) = self.contents.lock() {
            *current = contents.to_vec();
        }
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}

#[async_trait]
impl<S: Sink> Sink for std::sync::Arc<S> {
    async fn load(&self) -> Result<Vec<u8>, StoreError> {
        (**self).load().await
    }

    async fn flush(&self, contents: &[u8]) -> Result<(), StoreError> {
        (**self).flush(contents).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_file_sink_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("users.json");
        std::fs::write(&path, "[]").unwrap();

        let sink = FileSink::new(&path);
        assert_eq!(sink.load().await.unwrap(), b"[]");

        sink.flush(br#"[{"id":1}]"#).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), br#"[{"id":1}]"#);
        assert!(!dir.path().join("users.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_file_sink_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let sink = FileSink::new(dir.path().join("absent.json"));

        let err = sink.load().await.unwrap_err();
        assert!(matches!(err, StoreError::Read { .. }));
    }

    #[tokio::test]
    async fn test_memory_sink_fails_when_armed() {
        let sink = MemorySink::new("[]");
        sink.fail_next(1);

        assert!(sink.flush(b"[1]").await.is_err());
        assert_eq!(sink.contents(), b"[]");
        assert_eq!(sink.flush_count(), 0);

        sink.flush(b"[2]").await.unwrap();
        assert_eq!(sink.contents(), b"[2]");
        assert_eq!(sink.flush_count(), 1);
    }
}
