use crate::config::{Config, ServerConfig};
use crate::error::FrameworkError;
use crate::http::{collect_body, HttpResponse, Request};
use crate::middleware::{Middleware, MiddlewareStack};
use crate::routing::Router;
use bytes::Bytes;
use http_body_util::Full;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub struct Server {
    router: Arc<Router>,
    middleware: MiddlewareStack,
    host: String,
    port: u16,
    max_body_size: usize,
}

impl Server {
    pub fn new(router: impl Into<Router>) -> Self {
        Self {
            router: Arc::new(router.into()),
            middleware: MiddlewareStack::new(),
            host: "127.0.0.1".to_string(),
            port: ServerConfig::DEFAULT_PORT,
            max_body_size: 1024 * 1024,
        }
    }

    pub fn from_config(router: impl Into<Router>) -> Self {
        let config = Config::get::<ServerConfig>().unwrap_or_else(ServerConfig::from_env);
        Self {
            router: Arc::new(router.into()),
            middleware: MiddlewareStack::registered(),
            host: config.host,
            port: config.port,
            max_body_size: config.max_body_size,
        }
    }

    /// Add global middleware (runs on every request)
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// Server::from_config(router)
    ///     .middleware(LoggingMiddleware)
    ///     .run()
    ///     .await;
    /// ```
    pub fn middleware<M: Middleware + 'static>(mut self, middleware: M) -> Self {
        self.middleware = self.middleware.push(middleware);
        self
    }

    pub fn host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Largest request body accepted before answering 413
    pub fn max_body_size(mut self, limit: usize) -> Self {
        self.max_body_size = limit;
        self
    }

    fn get_addr(&self) -> Result<SocketAddr, FrameworkError> {
        let ip = self.host.parse().map_err(|e| {
            FrameworkError::internal(format!("Invalid host '{}': {}", self.host, e))
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Bind the configured address and serve until Ctrl-C
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = self.get_addr()?;
        let listener = TcpListener::bind(addr).await?;
        self.serve(listener).await
    }

    /// Serve connections from an already-bound listener until Ctrl-C
    pub async fn serve(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        tracing::info!("Server running on http://{}", listener.local_addr()?);

        let router = self.router;
        let middleware = Arc::new(self.middleware);
        let max_body_size = self.max_body_size;

        loop {
            let (stream, _) = tokio::select! {
                accepted = listener.accept() => accepted?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Shutting down");
                    return Ok(());
                }
            };
            let io = TokioIo::new(stream);
            let router = router.clone();
            let middleware = middleware.clone();

            tokio::spawn(async move {
                let service = service_fn(move |req: hyper::Request<hyper::body::Incoming>| {
                    let router = router.clone();
                    let middleware = middleware.clone();
                    async move {
                        Ok::<_, Infallible>(
                            handle_request(router, middleware, max_body_size, req).await,
                        )
                    }
                });

                if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                    tracing::warn!(error = ?err, "Error serving connection");
                }
            });
        }
    }
}

async fn handle_request(
    router: Arc<Router>,
    middleware: Arc<MiddlewareStack>,
    max_body_size: usize,
    req: hyper::Request<hyper::body::Incoming>,
) -> hyper::Response<Full<Bytes>> {
    let (parts, body) = req.into_parts();

    let response = match collect_body(body, max_body_size).await {
        Ok(bytes) => {
            let request = Request::new(parts, bytes);
            dispatch(&router, &middleware, request).await
        }
        Err(err) => {
            tracing::warn!(method = %parts.method, path = parts.uri.path(), error = %err, "Rejected request body");
            HttpResponse::from(err)
        }
    };

    response.into_hyper()
}

/// Route a request through global middleware to its handler
///
/// Unmatched routes answer `404 Not Found`. Used by the server and by
/// [`crate::testing::TestClient`].
pub async fn dispatch(
    router: &Router,
    middleware: &MiddlewareStack,
    mut request: Request,
) -> HttpResponse {
    match router.match_route(request.method(), request.path()) {
        Some((handler, params)) => {
            router.attach_state(&mut request);
            let request = request.with_params(params);

            // Both Ok and Err contain HttpResponse
            middleware
                .chain()
                .execute(request, handler)
                .await
                .unwrap_or_else(|e| e)
        }
        None => HttpResponse::text("404 Not Found").status(404),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::text;

    fn request(method: &str, uri: &str) -> Request {
        Request::from_http(
            http::Request::builder()
                .method(method)
                .uri(uri)
                .body(Bytes::new())
                .unwrap(),
        )
    }

    #[tokio::test]
    async fn test_dispatch_unmatched_is_404() {
        let router: Router = Router::new().get("/api/users", |_req| async { text("[]") }).into();
        let registry = MiddlewareStack::new();

        let res = dispatch(&router, &registry, request("GET", "/nope")).await;
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.body(), "404 Not Found");

        let res = dispatch(&router, &registry, request("POST", "/api/users")).await;
        assert_eq!(res.status_code(), 404);
    }

    async fn show(req: Request) -> crate::http::Response {
        let id = req.id_param("id")?;
        text(id.to_string())
    }

    #[tokio::test]
    async fn test_dispatch_passes_errors_through_as_responses() {
        let router: Router = Router::new().get("/api/users/{id}", show).into();
        let registry = MiddlewareStack::new();

        let res = dispatch(&router, &registry, request("GET", "/api/users/7")).await;
        assert_eq!(res.body(), "7");

        let res = dispatch(&router, &registry, request("GET", "/api/users/x")).await;
        assert_eq!(res.status_code(), 400);
        assert_eq!(res.body(), r#"{"error":"Invalid id:x"}"#);
    }

    #[test]
    fn test_invalid_host_is_an_error() {
        let server = Server::new(Router::new()).host("not a host");
        assert!(server.get_addr().is_err());
    }
}
