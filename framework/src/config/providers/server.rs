use crate::config::env::env;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Server host address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Maximum request body size in bytes (default: 1MB)
    pub max_body_size: usize,
}

impl ServerConfig {
    /// The port the storefront always listens on
    pub const DEFAULT_PORT: u16 = 3030;

    /// Build config from environment variables
    ///
    /// The port is not read from the environment.
    pub fn from_env() -> Self {
        Self {
            host: env("SERVER_HOST", "127.0.0.1".to_string()),
            port: Self::DEFAULT_PORT,
            max_body_size: env("SERVER_MAX_BODY_SIZE", 1024 * 1024), // 1MB
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_is_fixed() {
        std::env::set_var("SERVER_PORT", "9999");
        assert_eq!(ServerConfig::from_env().port, 3030);
        std::env::remove_var("SERVER_PORT");
    }
}
