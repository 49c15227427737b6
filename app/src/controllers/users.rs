//! `/api/users`: a flat list of users, each needing a name and username

use depot::{json, text, Request, Response, ResponseExt};
use serde_json::Value;

use crate::state::AppState;

pub async fn index(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    let users = state.users.list(&()).await?;
    json(Value::from(users))
}

pub async fn show(req: Request) -> Response {
    let id = req.id_param("id")?;
    let state = req.state::<AppState>()?;
    let user = state.users.show(&(), id).await?;
    json(Value::Object(user))
}

pub async fn store(req: Request) -> Response {
    let state = req.state::<AppState>()?;
    let body = req.record()?;
    let user = state.users.create(&(), body).await?;
    json(Value::Object(user)).status(201)
}

/// PUT: replace every field but the id
pub async fn update(req: Request) -> Response {
    let id = req.id_param("id")?;
    let state = req.state::<AppState>()?;
    let body = req.record()?;
    let user = state.users.replace(&(), id, body).await?;
    json(Value::Object(user))
}

/// PATCH: overwrite only the fields in the body
pub async fn patch(req: Request) -> Response {
    let id = req.id_param("id")?;
    let state = req.state::<AppState>()?;
    let body = req.record()?;
    let user = state.users.merge(&(), id, body).await?;
    json(Value::Object(user))
}

pub async fn destroy(req: Request) -> Response {
    let id = req.id_param("id")?;
    let state = req.state::<AppState>()?;
    state.users.remove(&(), id).await?;
    text(format!("User with id:{} successfully deleted", id))
}
