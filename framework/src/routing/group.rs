//! Route grouping with a shared prefix

use super::router::Method;
use super::{BoxedHandler, RouteBuilder, Router};
use crate::http::{Request, Response};
use std::future::Future;
use std::sync::Arc;

/// A route registered within a group
struct GroupRoute {
    method: Method,
    path: String,
    handler: Arc<BoxedHandler>,
}

/// Inner router used within a group closure
///
/// This captures routes without a prefix, which are later merged with the group's prefix.
pub struct GroupRouter {
    routes: Vec<GroupRoute>,
}

impl GroupRouter {
    fn new() -> Self {
        Self { routes: Vec::new() }
    }

    fn push<H, Fut>(mut self, method: Method, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let boxed: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        self.routes.push(GroupRoute {
            method,
            path: path.to_string(),
            handler: Arc::new(boxed),
        });
        self
    }

    /// Register a GET route within the group
    pub fn get<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Get, path, handler)
    }

    /// Register a POST route within the group
    pub fn post<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Post, path, handler)
    }

    /// Register a PUT route within the group
    pub fn put<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Put, path, handler)
    }

    /// Register a PATCH route within the group
    pub fn patch<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Patch, path, handler)
    }

    /// Register a DELETE route within the group
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> Self
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.push(Method::Delete, path, handler)
    }
}

impl Router {
    /// Create a route group with a shared prefix
    ///
    /// Routes defined within the group will have the prefix prepended to their paths.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// Router::new()
    ///     .group("/api", |r| {
    ///         r.get("/users", users::index)          // -> GET /api/users
    ///          .post("/users", users::store)         // -> POST /api/users
    ///          .patch("/users/{id}", users::update)  // -> PATCH /api/users/{id}
    ///     })
    /// ```
    pub fn group<F>(mut self, prefix: &str, builder_fn: F) -> Router
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        let built = builder_fn(GroupRouter::new());
        for route in built.routes {
            let full_path = format!("{}{}", prefix, route.path);
            self.insert(route.method, &full_path, route.handler);
        }
        self
    }
}

// Allow RouteBuilder to chain into groups
impl RouteBuilder {
    /// Create a route group with a shared prefix
    pub fn group<F>(self, prefix: &str, builder_fn: F) -> Router
    where
        F: FnOnce(GroupRouter) -> GroupRouter,
    {
        self.router.group(prefix, builder_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::text;

    async fn ok(_req: Request) -> Response {
        text("ok")
    }

    #[test]
    fn test_group_prefixes_every_route() {
        let router = Router::new().group("/api", |r| {
            r.get("/users", ok)
                .post("/users", ok)
                .put("/users/{id}", ok)
                .patch("/users/{id}", ok)
                .delete("/users/{id}", ok)
        });

        assert!(router.match_route(&http::Method::GET, "/api/users").is_some());
        assert!(router.match_route(&http::Method::POST, "/api/users").is_some());
        assert!(router.match_route(&http::Method::PUT, "/api/users/1").is_some());
        assert!(router.match_route(&http::Method::PATCH, "/api/users/1").is_some());
        assert!(router.match_route(&http::Method::DELETE, "/api/users/1").is_some());
        assert!(router.match_route(&http::Method::GET, "/users").is_none());
    }
}
