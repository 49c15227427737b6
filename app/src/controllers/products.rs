//! `/api/products`: products grouped by category, ids unique per category

use depot::{json, text, FrameworkError, Redirect, Request, Response, ResponseExt};
use serde_json::Value;

use crate::state::AppState;

fn category(req: &Request) -> Result<String, FrameworkError> {
    Ok(req.param("type")?.to_string())
}

/// Category and id of a single-product route
///
/// An unknown category is reported before a malformed id.
async fn target(req: &Request, state: &AppState) -> Result<(String, i64), FrameworkError> {
    let category = category(req)?;
    state.products.check_scope(&category).await?;
    let id = req.id_param("id")?;
    Ok((category, id))
}

pub async fn index(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    json(state.products.all().await?)
}

/// Every product in one category
pub async fn category_index(req: Request) -> Response {
    let category = category(&req)?;
    let state = req.state::<AppState>()?;
    let products = state.products.list(&category).await?;
    json(Value::from(products))
}

pub async fn show(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    let (category, id) = target(&req, &state).await?;
    let product = state.products.show(&category, id).await?;
    json(Value::Object(product))
}

/// Create a product; a form submitted from the HTML pages is redirected
/// to the new product's page
pub async fn store(req: Request) -> Response {
    let category = category(&req)?;
    let state = req.state::<AppState>()?;
    let body = req.record()?;
    let product = state.products.create(&category, body).await?;

    if state.views && req.is_form() {
        let id = product.get("id").map(Value::to_string).unwrap_or_default();
        return Redirect::route("products.show")
            .with("type", category)
            .query("id", id)
            .into();
    }

    json(Value::Object(product)).status(201)
}

pub async fn update(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    let (category, id) = target(&req, &state).await?;
    let body = req.record()?;
    let product = state.products.replace(&category, id, body).await?;
    json(Value::Object(product))
}

pub async fn patch(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    let (category, id) = target(&req, &state).await?;
    let body = req.record()?;
    let product = state.products.merge(&category, id, body).await?;
    json(Value::Object(product))
}

pub async fn destroy(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    let (category, id) = target(&req, &state).await?;
    state.products.remove(&category, id).await?;
    text(format!(
        "Product in category:{} and id:{} successfully deleted",
        category, id
    ))
}
