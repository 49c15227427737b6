use crate::http::{Request, Response};
use matchit::Router as MatchitRouter;
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, OnceLock, RwLock};

/// Global registry mapping route names to path patterns
static ROUTE_REGISTRY: OnceLock<RwLock<HashMap<String, String>>> = OnceLock::new();

/// Register a route name -> path mapping
pub fn register_route_name(name: &str, path: &str) {
    let registry = ROUTE_REGISTRY.get_or_init(|| RwLock::new(HashMap::new()));
    if let Ok(mut map) = registry.write() {
        map.insert(name.to_string(), path.to_string());
    }
}

/// Characters left as-is in a path segment or query value
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode `raw` for use as one path segment or query value
///
/// ```rust,ignore
/// assert_eq!(encode_component("home goods"), "home%20goods");
/// ```
pub fn encode_component(raw: &str) -> String {
    utf8_percent_encode(raw, COMPONENT).to_string()
}

/// Fill a named route's `{param}` placeholders, percent-encoding each value
///
/// Returns `None` when no route was registered under `name`.
pub fn route_with_params(name: &str, params: &HashMap<String, String>) -> Option<String> {
    let registry = ROUTE_REGISTRY.get()?.read().ok()?;
    let path_pattern = registry.get(name)?;

    let mut url = path_pattern.clone();
    for (key, value) in params {
        url = url.replace(&format!("{{{}}}", key), &encode_component(value));
    }
    Some(url)
}

/// Type alias for route handlers
pub type BoxedHandler =
    Box<dyn Fn(Request) -> Pin<Box<dyn Future<Output = Response> + Send>> + Send + Sync>;

/// HTTP Router
///
/// Handlers are plain `async fn(Request) -> Response`. Shared state such as
/// record stores is attached once with [`Router::with_state`] and read back
/// in handlers with `req.state::<T>()`.
pub struct Router {
    get_routes: MatchitRouter<Arc<BoxedHandler>>,
    post_routes: MatchitRouter<Arc<BoxedHandler>>,
    put_routes: MatchitRouter<Arc<BoxedHandler>>,
    patch_routes: MatchitRouter<Arc<BoxedHandler>>,
    delete_routes: MatchitRouter<Arc<BoxedHandler>>,
    /// Copied into every matched request's extensions
    state: http::Extensions,
}

impl Router {
    pub fn new() -> Self {
        Self {
            get_routes: MatchitRouter::new(),
            post_routes: MatchitRouter::new(),
            put_routes: MatchitRouter::new(),
            patch_routes: MatchitRouter::new(),
            delete_routes: MatchitRouter::new(),
            state: http::Extensions::new(),
        }
    }

    /// Attach shared state that handlers read with `req.state::<T>()`
    ///
    /// One value per type; attaching a second value of the same type replaces the first.
    pub fn with_state<T: Clone + Send + Sync + 'static>(mut self, state: T) -> Self {
        self.state.insert(state);
        self
    }

    fn routes_mut(&mut self, method: Method) -> &mut MatchitRouter<Arc<BoxedHandler>> {
        match method {
            Method::Get => &mut self.get_routes,
            Method::Post => &mut self.post_routes,
            Method::Put => &mut self.put_routes,
            Method::Patch => &mut self.patch_routes,
            Method::Delete => &mut self.delete_routes,
        }
    }

    /// Insert a route with a pre-boxed handler (internal use for groups)
    pub(crate) fn insert(&mut self, method: Method, path: &str, handler: Arc<BoxedHandler>) {
        if let Err(e) = self.routes_mut(method).insert(path, handler) {
            tracing::warn!(path, error = %e, "Route not registered");
        }
    }

    fn add<H, Fut>(mut self, method: Method, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        let handler: BoxedHandler = Box::new(move |req| Box::pin(handler(req)));
        self.insert(method, path, Arc::new(handler));
        RouteBuilder {
            router: self,
            last_path: path.to_string(),
        }
    }

    /// Register a GET route
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Get, path, handler)
    }

    /// Register a POST route
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Post, path, handler)
    }

    /// Register a PUT route
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Put, path, handler)
    }

    /// Register a PATCH route
    pub fn patch<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Patch, path, handler)
    }

    /// Register a DELETE route
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.add(Method::Delete, path, handler)
    }

    /// Match a request and return the handler with extracted params
    ///
    /// `path` is the raw request path; param values come back percent-decoded.
    pub fn match_route(
        &self,
        method: &http::Method,
        path: &str,
    ) -> Option<(Arc<BoxedHandler>, HashMap<String, String>)> {
        let router = match *method {
            http::Method::GET => &self.get_routes,
            http::Method::POST => &self.post_routes,
            http::Method::PUT => &self.put_routes,
            http::Method::PATCH => &self.patch_routes,
            http::Method::DELETE => &self.delete_routes,
            _ => return None,
        };

        router.at(path).ok().map(|matched| {
            let params: HashMap<String, String> = matched
                .params
                .iter()
                .map(|(k, v)| {
                    (
                        k.to_string(),
                        percent_decode_str(v).decode_utf8_lossy().into_owned(),
                    )
                })
                .collect();
            (matched.value.clone(), params)
        })
    }

    /// Copy the router's state into a request about to be dispatched
    pub fn attach_state(&self, request: &mut Request) {
        request.extensions_mut().extend(self.state.clone());
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

/// HTTP method a route is registered under
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

/// Builder returned after registering a route, enabling .name() chaining
pub struct RouteBuilder {
    pub(crate) router: Router,
    last_path: String,
}

impl RouteBuilder {
    /// Name the most recently registered route
    pub fn name(self, name: &str) -> Router {
        register_route_name(name, &self.last_path);
        self.router
    }

    /// Attach shared state (see [`Router::with_state`])
    pub fn with_state<T: Clone + Send + Sync + 'static>(self, state: T) -> Router {
        self.router.with_state(state)
    }

    /// Register a GET route (for chaining without .name())
    pub fn get<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.get(path, handler)
    }

    /// Register a POST route (for chaining without .name())
    pub fn post<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.post(path, handler)
    }

    /// Register a PUT route (for chaining without .name())
    pub fn put<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.put(path, handler)
    }

    /// Register a PATCH route (for chaining without .name())
    pub fn patch<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.patch(path, handler)
    }

    /// Register a DELETE route (for chaining without .name())
    pub fn delete<H, Fut>(self, path: &str, handler: H) -> RouteBuilder
    where
        H: Fn(Request) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Response> + Send + 'static,
    {
        self.router.delete(path, handler)
    }
}

impl From<RouteBuilder> for Router {
    fn from(builder: RouteBuilder) -> Self {
        builder.router
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{text, HttpResponse};

    async fn ok(_req: Request) -> Response {
        text("ok")
    }

    #[test]
    fn test_matches_by_method_and_extracts_params() {
        let router: Router = Router::new()
            .get("/api/products/{type}/{id}", ok)
            .patch("/api/products/{type}/{id}", ok)
            .into();

        let (_, params) = router
            .match_route(&http::Method::GET, "/api/products/phones/3")
            .unwrap();
        assert_eq!(params["type"], "phones");
        assert_eq!(params["id"], "3");

        assert!(router
            .match_route(&http::Method::PATCH, "/api/products/phones/3")
            .is_some());
        assert!(router
            .match_route(&http::Method::DELETE, "/api/products/phones/3")
            .is_none());
        assert!(router
            .match_route(&http::Method::HEAD, "/api/products/phones/3")
            .is_none());
    }

    #[test]
    fn test_params_are_percent_decoded() {
        let router: Router = Router::new().get("/api/products/{type}/{id}", ok).into();

        let (_, params) = router
            .match_route(&http::Method::GET, "/api/products/home%20goods/%31")
            .unwrap();
        assert_eq!(params["type"], "home goods");
        assert_eq!(params["id"], "1");
    }

    #[test]
    fn test_named_routes_encode_params() {
        let _router = Router::new()
            .get("/test-routes/{type}", ok)
            .name("test.routes.show");

        let params = HashMap::from([("type".to_string(), "home goods/&".to_string())]);
        assert_eq!(
            route_with_params("test.routes.show", &params),
            Some("/test-routes/home%20goods%2F%26".to_string())
        );
        assert_eq!(route_with_params("test.routes.missing", &HashMap::new()), None);
    }

    #[test]
    fn test_encode_component_keeps_unreserved() {
        assert_eq!(encode_component("phones"), "phones");
        assert_eq!(encode_component("a-b_c.d~e"), "a-b_c.d~e");
        assert_eq!(encode_component("50% off?"), "50%25%20off%3F");
    }

    #[tokio::test]
    async fn test_state_is_attached_to_requests() {
        async fn greet(req: Request) -> Response {
            let greeting = req.state::<String>()?;
            Ok(HttpResponse::text(greeting))
        }

        let router = Router::new().get("/", greet).with_state("hello".to_string());
        let (handler, _) = router.match_route(&http::Method::GET, "/").unwrap();

        let mut req = Request::from_http(http::Request::new(bytes::Bytes::new()));
        router.attach_state(&mut req);
        let res = handler(req).await.unwrap();
        assert_eq!(res.body(), "hello");
    }
}
