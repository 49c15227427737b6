#![allow(dead_code)]

use depot::store::MemorySink;
use depot::testing::TestClient;
use serde_json::{json, Value};
use std::sync::Arc;
use storefront::{routes, AppState};

pub struct Harness {
    pub client: TestClient,
    pub state: AppState,
    pub users: Arc<MemorySink>,
    pub products: Arc<MemorySink>,
}

pub fn seed_users() -> Value {
    json!([
        {"id": 1, "name": "Leanne", "username": "bret"},
        {"id": 2, "name": "Ervin", "username": "antonette"}
    ])
}

pub fn seed_products() -> Value {
    json!({
        "phones": [
            {"id": 1, "name": "Pixel 8", "price": 699},
            {"id": 2, "name": "iPhone 15", "price": 799}
        ],
        "laptops": [
            {"id": 1, "name": "ThinkPad", "price": 1499}
        ]
    })
}

pub async fn harness_with(users: Value, products: Value, views: bool) -> Harness {
    let users = Arc::new(MemorySink::from_json(&users));
    let products = Arc::new(MemorySink::from_json(&products));
    let state = AppState::open(users.clone(), products.clone(), views)
        .await
        .expect("seed data loads");

    Harness {
        client: TestClient::new(routes::build(state.clone())),
        state,
        users,
        products,
    }
}

pub async fn harness() -> Harness {
    harness_with(seed_users(), seed_products(), false).await
}

pub async fn views_harness() -> Harness {
    harness_with(seed_users(), seed_products(), true).await
}
