use std::fmt;
use std::path::Path;

/// Deployment environment, read from `APP_ENV`
///
/// Picks the extra `.env.{name}` files to load and the default log level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    /// Unset, `local` or `development`
    Development,
    Production,
    Testing,
    /// Any other `APP_ENV` value, used as-is for file names
    Named(String),
}

impl Environment {
    pub fn detect() -> Self {
        Self::parse(std::env::var("APP_ENV").ok().as_deref())
    }

    fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") | Some("local") | Some("development") => Self::Development,
            Some("production") => Self::Production,
            Some("testing") => Self::Testing,
            Some(other) => Self::Named(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
            Self::Named(name) => name,
        }
    }

    /// Development runs log at `debug` unless `RUST_LOG` says otherwise
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Load `.env` files from `project_root` and return the detected environment
///
/// Later entries lose to earlier ones, and the process environment beats
/// every file:
///
/// 1. `.env.{environment}.local`
/// 2. `.env.{environment}`
/// 3. `.env.local`
/// 4. `.env`
pub fn load_dotenv(project_root: &Path) -> Environment {
    let environment = Environment::detect();
    load_files(project_root, &environment);
    environment
}

fn load_files(project_root: &Path, environment: &Environment) {
    let name = environment.name();
    let files = [
        format!(".env.{}.local", name),
        format!(".env.{}", name),
        ".env.local".to_string(),
        ".env".to_string(),
    ];

    // dotenvy never overwrites a variable that is already set
    for file in files {
        let _ = dotenvy::from_path(project_root.join(file));
    }
}

/// Read and parse an environment variable, falling back to `default` when it
/// is missing or does not parse
///
/// # Example
/// ```
/// use depot::config::env;
///
/// let limit: usize = env("SERVER_MAX_BODY_SIZE", 1024 * 1024);
/// let host = env("SERVER_HOST", "127.0.0.1".to_string());
/// ```
pub fn env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
