use depot::env;
use std::path::PathBuf;

/// Where the collections live on disk
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Users file, a JSON array
    pub users_path: PathBuf,
    /// Products file, a JSON object of category arrays
    pub products_path: PathBuf,
}

impl StorageConfig {
    /// Build config from environment variables
    pub fn from_env() -> Self {
        Self {
            users_path: env("DATA_USERS_PATH", "./data/users.json".to_string()).into(),
            products_path: env("DATA_PRODUCTS_PATH", "./data/products.json".to_string()).into(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
