//! End to end over a real socket

mod common;

use depot::Server;
use serde_json::{json, Value};
use std::net::SocketAddr;
use storefront::middleware::LoggingMiddleware;
use storefront::routes;
use tokio::net::TcpListener;

async fn spawn_server(max_body_size: usize) -> SocketAddr {
    let h = common::harness().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = Server::new(routes::build(h.state))
        .middleware(LoggingMiddleware)
        .max_body_size(max_body_size);
    tokio::spawn(server.serve(listener));

    addr
}

#[tokio::test]
async fn serves_the_api_over_http() {
    let addr = spawn_server(1024 * 1024).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("http://{}/api/users", addr))
        .json(&json!({"name": "Ada", "username": "ada"}))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 201);
    let created: Value = res.json().await.unwrap();
    assert_eq!(created, json!({"id": 3, "name": "Ada", "username": "ada"}));

    let res = client
        .get(format!("http://{}/api/users/abc", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 400);

    let res = client
        .get(format!("http://{}/missing", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 404);
    assert_eq!(res.text().await.unwrap(), "404 Not Found");
}

#[tokio::test]
async fn oversized_bodies_are_rejected() {
    let addr = spawn_server(64).await;

    let res = reqwest::Client::new()
        .post(format!("http://{}/api/users", addr))
        .header("content-type", "application/json")
        .body(format!(r#"{{"name": "{}", "username": "x"}}"#, "a".repeat(256)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status().as_u16(), 413);
}
