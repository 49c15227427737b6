use depot::{async_trait, Middleware, Next, Request, Response};
use std::time::Instant;

/// Logs method, path, status and elapsed time for every request
pub struct LoggingMiddleware;

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(&self, request: Request, next: Next) -> Response {
        let method = request.method().clone();
        let path = request.path().to_string();
        let started = Instant::now();

        let response = next(request).await;

        let status = match &response {
            Ok(res) | Err(res) => res.status_code(),
        };
        let elapsed = started.elapsed();
        if status >= 500 {
            tracing::error!(%method, %path, status, ?elapsed, "request failed");
        } else {
            tracing::info!(%method, %path, status, ?elapsed, "request");
        }

        response
    }
}
