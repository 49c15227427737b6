use crate::config::env::{env, Environment};

/// Application-wide settings
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Shown in the startup log
    pub name: String,
    pub environment: Environment,
    /// Serve the HTML product pages alongside the JSON API
    pub views: bool,
}

impl AppConfig {
    /// `APP_NAME`, `APP_ENV` and `APP_VIEWS`
    pub fn from_env() -> Self {
        Self {
            name: env("APP_NAME", "Storefront".to_string()),
            environment: Environment::detect(),
            views: env("APP_VIEWS", false),
        }
    }

    /// The same config with the HTML pages switched on
    pub fn with_views(self) -> Self {
        Self {
            views: true,
            ..self
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
