//! Configuration
//!
//! - `.env` file loading with environment-based precedence
//! - Type-safe configuration structs stored by type
//!
//! # Example
//!
//! ```rust,no_run
//! use depot::{Config, ServerConfig};
//!
//! Config::init(std::path::Path::new("."));
//!
//! let server = Config::get::<ServerConfig>().unwrap();
//! println!("Listening on {}:{}", server.host, server.port);
//! ```

pub mod env;
pub mod providers;
mod repository;

pub use env::{env, load_dotenv, Environment};
pub use providers::{AppConfig, ServerConfig};

use std::path::Path;

/// Main Config facade for accessing configuration
pub struct Config;

impl Config {
    /// Initialize the configuration system
    ///
    /// Call at startup, before creating the server. Loads `.env` files and
    /// registers [`AppConfig`] and [`ServerConfig`].
    ///
    /// Returns the environment named by `APP_ENV`.
    pub fn init(project_root: &Path) -> Environment {
        let env = env::load_dotenv(project_root);

        repository::register(AppConfig::from_env());
        repository::register(ServerConfig::from_env());

        env
    }

    /// Get a typed config struct from the repository
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use depot::{AppConfig, Config};
    ///
    /// let app = Config::get::<AppConfig>().unwrap();
    /// println!("HTML pages enabled: {}", app.views);
    /// ```
    pub fn get<T: std::any::Any + Send + Sync + Clone + 'static>() -> Option<T> {
        repository::get::<T>()
    }

    /// Register a config struct, replacing any earlier value of the same type
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use depot::Config;
    ///
    /// #[derive(Clone)]
    /// struct StorageConfig {
    ///     users_path: String,
    /// }
    ///
    /// Config::register(StorageConfig {
    ///     users_path: "./data/users.json".to_string(),
    /// });
    /// ```
    pub fn register<T: std::any::Any + Send + Sync + 'static>(config: T) {
        repository::register(config);
    }

    /// The environment from the registered [`AppConfig`], or `APP_ENV`
    pub fn environment() -> Environment {
        Config::get::<AppConfig>()
            .map(|c| c.environment)
            .unwrap_or_else(Environment::detect)
    }
}
