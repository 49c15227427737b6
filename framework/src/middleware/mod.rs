//! Middleware wrapping route handlers
//!
//! A middleware receives the request and a [`Next`] continuation; it can
//! inspect or short-circuit the request and post-process the response.
//!
//! ```rust,ignore
//! use depot::{async_trait, Middleware, Next, Request, Response};
//!
//! pub struct TimingMiddleware;
//!
//! #[async_trait]
//! impl Middleware for TimingMiddleware {
//!     async fn handle(&self, request: Request, next: Next) -> Response {
//!         let started = std::time::Instant::now();
//!         let response = next(request).await;
//!         tracing::info!(elapsed = ?started.elapsed());
//!         response
//!     }
//! }
//! ```

mod registry;

pub use registry::{register_global_middleware, MiddlewareStack};

use crate::http::{Request, Response};
use crate::routing::BoxedHandler;
use async_trait::async_trait;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// The rest of the chain, ending in the route handler
pub type Next = Arc<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

#[async_trait]
pub trait Middleware: Send + Sync {
    async fn handle(&self, request: Request, next: Next) -> Response;
}

/// Shared, type-erased middleware
pub type BoxedMiddleware = Arc<dyn Middleware>;

pub fn into_boxed<M: Middleware + 'static>(middleware: M) -> BoxedMiddleware {
    Arc::new(middleware)
}

/// Ordered middleware around one handler invocation
#[derive(Default)]
pub struct MiddlewareChain {
    middleware: Vec<BoxedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, middleware: impl IntoIterator<Item = BoxedMiddleware>) {
        self.middleware.extend(middleware);
    }

    /// Run the chain; the first middleware added is the outermost
    pub async fn execute(self, request: Request, handler: Arc<BoxedHandler>) -> Response {
        let mut next: Next = Arc::new(move |req| (handler.as_ref())(req));

        for middleware in self.middleware.into_iter().rev() {
            let inner = next.clone();
            next = Arc::new(move |req| {
                let middleware = middleware.clone();
                let inner = inner.clone();
                Box::pin(async move { middleware.handle(req, inner).await })
                    as Pin<Box<dyn Future<Output = Response> + Send>>
            });
        }

        next(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::HttpResponse;
    use bytes::Bytes;
    use std::sync::Mutex;

    struct Tag {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Tag {
        async fn handle(&self, request: Request, next: Next) -> Response {
            self.log.lock().unwrap().push(format!("{} in", self.name));
            let response = next(request).await;
            self.log.lock().unwrap().push(format!("{} out", self.name));
            response
        }
    }

    struct Deny;

    #[async_trait]
    impl Middleware for Deny {
        async fn handle(&self, _request: Request, _next: Next) -> Response {
            Err(HttpResponse::text("denied").status(403))
        }
    }

    fn handler() -> Arc<BoxedHandler> {
        let boxed: BoxedHandler = Box::new(|_req| Box::pin(async { Ok::<_, HttpResponse>(HttpResponse::text("ok")) }));
        Arc::new(boxed)
    }

    fn request() -> Request {
        Request::from_http(http::Request::new(Bytes::new()))
    }

    #[tokio::test]
    async fn test_chain_runs_handler() {
        let res = MiddlewareChain::new().execute(request(), handler()).await.unwrap();
        assert_eq!(res.body(), "ok");
    }

    #[tokio::test]
    async fn test_middleware_can_short_circuit() {
        let mut chain = MiddlewareChain::new();
        chain.extend([into_boxed(Deny)]);

        let res = chain.execute(request(), handler()).await.unwrap_err();
        assert_eq!(res.status_code(), 403);
    }

    #[tokio::test]
    async fn test_first_added_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.extend([
            into_boxed(Tag { name: "a", log: log.clone() }),
            into_boxed(Tag { name: "b", log: log.clone() }),
        ]);

        chain.execute(request(), handler()).await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["a in", "b in", "b out", "a out"]);
    }
}
