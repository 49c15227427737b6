use depot::resource::Resource;
use depot::store::{Catalog, FileSink, Sink, Store, StoreError, Table};
use std::sync::Arc;

use crate::config::StorageConfig;

/// Shared handler state, attached to the router
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<Resource<Table>>,
    pub products: Arc<Resource<Catalog>>,
    /// The HTML pages are being served
    pub views: bool,
}

impl AppState {
    /// Open both collections through the given sinks
    pub async fn open(
        users: impl Sink,
        products: impl Sink,
        views: bool,
    ) -> Result<Self, StoreError> {
        let users = Store::open(users).await?;
        let products = Store::open(products).await?;

        Ok(Self {
            users: Arc::new(Resource::new(users, "user").required(&["name", "username"])),
            products: Arc::new(Resource::new(products, "product")),
            views,
        })
    }

    /// Open both collections from the configured files
    pub async fn from_files(storage: &StorageConfig, views: bool) -> Result<Self, StoreError> {
        Self::open(
            FileSink::new(&storage.users_path),
            FileSink::new(&storage.products_path),
            views,
        )
        .await
    }
}
