//! In-memory record store with whole-file persistence
//!
//! A [`Store`] loads its container once through a [`Sink`] and keeps it for
//! the life of the process. Every write runs mutate-then-flush under one
//! exclusive lock, and the container is restored if the flush fails, so
//! memory never runs ahead of what is on disk.
//!
//! # Example
//!
//! ```rust,ignore
//! use depot::store::{FileSink, Store, Table};
//!
//! let users = Store::<Table>::open(FileSink::new("./data/users.json")).await?;
//! let count = users.read(|t| t.len()).await;
//! users.write(|t| { t.append(record); Ok(()) }).await?;
//! ```

mod catalog;
pub mod sink;
mod table;

pub use catalog::Catalog;
pub use sink::{FileSink, MemorySink, Sink};
pub use table::Table;

use crate::error::FrameworkError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use tokio::sync::RwLock;

/// A single record: an insertion-ordered JSON object
pub type Record = serde_json::Map<String, serde_json::Value>;

/// The integer id of a record, if it has one
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(serde_json::Value::as_i64)
}

/// Errors from loading or flushing a collection
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("failed to read {location}: {message}")]
    Read { location: String, message: String },

    #[error("failed to write {location}: {message}")]
    Write { location: String, message: String },

    #[error("{location} is not a valid collection: {message}")]
    Parse { location: String, message: String },

    #[error("failed to serialize collection: {0}")]
    Serialize(String),
}

impl StoreError {
    pub(crate) fn read(location: String, err: std::io::Error) -> Self {
        Self::Read {
            location,
            message: err.to_string(),
        }
    }

    pub(crate) fn write(location: String, err: std::io::Error) -> Self {
        Self::Write {
            location,
            message: err.to_string(),
        }
    }
}

/// A container shape the store can hold
///
/// `Scope` selects one [`Table`] inside the container: `()` for a flat table,
/// a category name for a [`Catalog`].
pub trait Container: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Scope: Send + Sync;

    fn table(&self, scope: &Self::Scope) -> Result<&Table, FrameworkError>;

    fn table_mut(&mut self, scope: &Self::Scope) -> Result<&mut Table, FrameworkError>;
}

/// A long-lived container plus the sink it is persisted to
pub struct Store<C> {
    container: RwLock<C>,
    sink: Box<dyn Sink>,
}

impl<C: Container> Store<C> {
    /// Load the container from `sink`
    ///
    /// Fails if the sink cannot be read or does not hold valid JSON of the
    /// expected shape.
    pub async fn open(sink: impl Sink) -> Result<Self, StoreError> {
        let bytes = sink.load().await?;
        let container = serde_json::from_slice(&bytes).map_err(|e| StoreError::Parse {
            location: sink.describe(),
            message: e.to_string(),
        })?;
        tracing::debug!(location = %sink.describe(), "Loaded collection");
        Ok(Self::with_container(container, sink))
    }

    /// Wrap an already built container without loading
    pub fn with_container(container: C, sink: impl Sink) -> Self {
        Self {
            container: RwLock::new(container),
            sink: Box::new(sink),
        }
    }

    /// Run `f` against the container under a shared lock
    pub async fn read<T>(&self, f: impl FnOnce(&C) -> T) -> T {
        let guard = self.container.read().await;
        f(&*guard)
    }

    /// Mutate the container and flush it as one unit
    ///
    /// Concurrent writers queue on the lock, so a read-modify-write inside `f`
    /// never observes a stale container. If `f` fails nothing is flushed; if
    /// the flush fails the container is rolled back.
    pub async fn write<T>(
        &self,
        f: impl FnOnce(&mut C) -> Result<T, FrameworkError>,
    ) -> Result<T, FrameworkError> {
        let mut guard = self.container.write().await;
        let snapshot = (*guard).clone();

        let value = match f(&mut *guard) {
            Ok(value) => value,
            Err(e) => {
                *guard = snapshot;
                return Err(e);
            }
        };

        let flushed = match serde_json::to_vec_pretty(&*guard) {
            Ok(bytes) => self.sink.flush(&bytes).await,
            Err(e) => Err(StoreError::Serialize(e.to_string())),
        };

        if let Err(e) = flushed {
            tracing::error!(location = %self.sink.describe(), error = %e, "Flush failed, rolling back");
            *guard = snapshot;
            return Err(e.into());
        }

        Ok(value)
    }

    /// Where this store persists to
    pub fn location(&self) -> String {
        self.sink.describe()
    }
}
