//! Testing utilities
//!
//! [`TestClient`] dispatches requests in-process through a router and its
//! middleware, without binding a socket. [`TestResponse`] offers fluent
//! assertions that report Expected/Received on failure.
//!
//! # Example
//!
//! ```rust,ignore
//! use depot::testing::TestClient;
//! use serde_json::json;
//!
//! let client = TestClient::new(routes::build(stores, false));
//!
//! client
//!     .post_json("/api/users", json!({"name": "Ada", "username": "ada"}))
//!     .await
//!     .assert_status(201)
//!     .assert_json(json!({"id": 1, "name": "Ada", "username": "ada"}));
//! ```

use crate::http::{HttpResponse, Request};
use crate::middleware::{Middleware, MiddlewareStack};
use crate::routing::Router;
use crate::server::dispatch;
use bytes::Bytes;
use serde_json::Value;
use std::panic::Location;

/// In-process HTTP client for a router
pub struct TestClient {
    router: Router,
    middleware: MiddlewareStack,
}

impl TestClient {
    pub fn new(router: impl Into<Router>) -> Self {
        Self {
            router: router.into(),
            middleware: MiddlewareStack::new(),
        }
    }

    /// Run `middleware` around every request, as `Server::middleware` does
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.push(middleware);
        self
    }

    /// Send a request with an optional content type and raw body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        content_type: Option<&str>,
        body: impl Into<Bytes>,
    ) -> TestResponse {
        let mut builder = http::Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let request = match builder.body(body.into()) {
            Ok(request) => Request::from_http(request),
            Err(e) => panic!("invalid test request {} {}: {}", method, uri, e),
        };

        TestResponse::new(dispatch(&self.router, &self.middleware, request).await)
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.send("GET", uri, None, Bytes::new()).await
    }

    pub async fn delete(&self, uri: &str) -> TestResponse {
        self.send("DELETE", uri, None, Bytes::new()).await
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send_json("POST", uri, body).await
    }

    pub async fn put_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send_json("PUT", uri, body).await
    }

    pub async fn patch_json(&self, uri: &str, body: Value) -> TestResponse {
        self.send_json("PATCH", uri, body).await
    }

    /// POST `fields` as an urlencoded form
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = serde_urlencoded::to_string(fields).unwrap_or_default();
        self.send(
            "POST",
            uri,
            Some("application/x-www-form-urlencoded"),
            body,
        )
        .await
    }

    async fn send_json(&self, method: &str, uri: &str, body: Value) -> TestResponse {
        self.send(method, uri, Some("application/json"), body.to_string())
            .await
    }
}

/// A dispatched response with fluent assertions
#[derive(Debug)]
pub struct TestResponse {
    inner: HttpResponse,
}

fn fail(location: &Location<'_>, assertion: &str, expected: &str, received: &str) -> ! {
    panic!(
        "\nassertion failed at {}\n  {}\n\n  Expected: {}\n  Received: {}\n",
        location, assertion, expected, received
    );
}

impl TestResponse {
    pub fn new(inner: HttpResponse) -> Self {
        Self { inner }
    }

    pub fn status(&self) -> u16 {
        self.inner.status_code()
    }

    pub fn text(&self) -> &str {
        self.inner.body()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.header_value(name)
    }

    /// Parse the body as JSON, panicking with the raw body if it is not
    #[track_caller]
    pub fn json(&self) -> Value {
        match serde_json::from_str(self.inner.body()) {
            Ok(value) => value,
            Err(e) => fail(
                Location::caller(),
                "response.json()",
                "a JSON body",
                &format!("{:?} ({})", self.inner.body(), e),
            ),
        }
    }

    #[track_caller]
    pub fn assert_status(self, expected: u16) -> Self {
        if self.status() != expected {
            fail(
                Location::caller(),
                "response.assert_status(expected)",
                &expected.to_string(),
                &format!("{} with body {:?}", self.status(), self.text()),
            );
        }
        self
    }

    #[track_caller]
    pub fn assert_json(self, expected: Value) -> Self {
        let received = self.json();
        if received != expected {
            fail(
                Location::caller(),
                "response.assert_json(expected)",
                &expected.to_string(),
                &received.to_string(),
            );
        }
        self
    }

    #[track_caller]
    pub fn assert_text(self, expected: &str) -> Self {
        if self.text() != expected {
            fail(
                Location::caller(),
                "response.assert_text(expected)",
                &format!("{:?}", expected),
                &format!("{:?}", self.text()),
            );
        }
        self
    }

    /// Assert the body contains `needle`
    #[track_caller]
    pub fn assert_see(self, needle: &str) -> Self {
        if !self.text().contains(needle) {
            fail(
                Location::caller(),
                "response.assert_see(text)",
                &format!("body containing {:?}", needle),
                &format!("{:?}", self.text()),
            );
        }
        self
    }

    #[track_caller]
    pub fn assert_header(self, name: &str, expected: &str) -> Self {
        if self.header(name) != Some(expected) {
            fail(
                Location::caller(),
                "response.assert_header(name, expected)",
                &format!("{}: {}", name, expected),
                &format!("{}: {:?}", name, self.header(name)),
            );
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{json, text, Response};
    use serde_json::json;

    async fn echo(req: Request) -> Response {
        let record = req.record()?;
        json(Value::Object(record))
    }

    async fn hello(_req: Request) -> Response {
        text("hello")
    }

    fn client() -> TestClient {
        TestClient::new(
            Router::new()
                .get("/hello", hello)
                .post("/echo", echo)
                .patch("/echo", echo),
        )
    }

    #[tokio::test]
    async fn test_client_round_trips_bodies() {
        let client = client();

        client
            .post_json("/echo", json!({"a": 1}))
            .await
            .assert_status(200)
            .assert_json(json!({"a": 1}));

        client
            .patch_json("/echo", json!({"b": true}))
            .await
            .assert_json(json!({"b": true}));

        client
            .post_form("/echo", &[("name", "Pixel 8"), ("price", "5")])
            .await
            .assert_json(json!({"name": "Pixel 8", "price": "5"}));
    }

    #[tokio::test]
    async fn test_text_and_header_assertions() {
        client()
            .get("/hello")
            .await
            .assert_text("hello")
            .assert_see("ell")
            .assert_header("Content-Type", "text/plain; charset=utf-8");
    }

    #[tokio::test]
    #[should_panic(expected = "Expected: 201")]
    async fn test_failed_assertion_reports_expected() {
        client().get("/hello").await.assert_status(201);
    }

    #[tokio::test]
    async fn test_unmatched_route() {
        client().delete("/hello").await.assert_status(404);
    }
}
