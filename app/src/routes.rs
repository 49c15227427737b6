use depot::{AppConfig, BoxError, Config, Router};

use crate::config::StorageConfig;
use crate::controllers::{products, users};
use crate::state::AppState;
use crate::views;

/// Load the collections and build the router
pub async fn register() -> Result<Router, BoxError> {
    let storage = Config::get::<StorageConfig>().unwrap_or_default();
    let views = Config::get::<AppConfig>().map(|c| c.views).unwrap_or(false);

    let state = AppState::from_files(&storage, views).await?;
    tracing::info!(
        users = %storage.users_path.display(),
        products = %storage.products_path.display(),
        views,
        "Loaded collections"
    );

    Ok(build(state))
}

/// The JSON API, plus the HTML pages when `state.views` is set
pub fn build(state: AppState) -> Router {
    let mut router = Router::new().group("/api", |r| {
        r.get("/users", users::index)
            .get("/users/{id}", users::show)
            .post("/users", users::store)
            .put("/users/{id}", users::update)
            .patch("/users/{id}", users::patch)
            .delete("/users/{id}", users::destroy)
            .get("/products", products::index)
            .get("/products/{type}", products::category_index)
            .get("/products/{type}/{id}", products::show)
            .post("/products/{type}", products::store)
            .put("/products/{type}/{id}", products::update)
            .patch("/products/{type}/{id}", products::patch)
            .delete("/products/{type}/{id}", products::destroy)
    });

    if state.views {
        router = router
            .get("/products", views::products::index)
            .name("products.index")
            .get("/products/{type}", views::products::show)
            .name("products.show")
            .get("/new", views::products::create)
            .name("products.create");
    }

    router.with_state(state)
}
