use super::body::{parse_form_record, parse_json_record};
use super::ParamError;
use crate::error::FrameworkError;
use crate::store::Record;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;

/// HTTP Request wrapper with the body already collected
///
/// The server reads the whole body (up to the configured limit) before
/// dispatch, so handlers can parse it synchronously and tests can build
/// requests without a connection.
pub struct Request {
    parts: http::request::Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Request {
    pub fn new(parts: http::request::Parts, body: Bytes) -> Self {
        Self {
            parts,
            body,
            params: HashMap::new(),
        }
    }

    /// Build a request from an `http::Request` with a byte body
    pub fn from_http(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self::new(parts, body)
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    /// Get the request method
    pub fn method(&self) -> &http::Method {
        &self.parts.method
    }

    /// Get the request path
    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    /// Get the raw query string, if any
    pub fn query_string(&self) -> Option<&str> {
        self.parts.uri.query()
    }

    /// Get a route parameter by name (e.g., /users/{id})
    /// Returns Err(ParamError) if the parameter is missing, enabling use of `?` operator
    pub fn param(&self, name: &str) -> Result<&str, ParamError> {
        self.params
            .get(name)
            .map(|s| s.as_str())
            .ok_or_else(|| ParamError {
                param_name: name.to_string(),
            })
    }

    /// Get a route parameter parsed as a record id
    ///
    /// Anything that is not a plain base-10 integer is `InvalidId` (400).
    pub fn id_param(&self, name: &str) -> Result<i64, FrameworkError> {
        let raw = self.param(name)?;
        parse_id(raw)
    }

    /// Get all route parameters
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Deserialize the query string into `T`
    ///
    /// A missing query string deserializes like an empty one.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, FrameworkError> {
        let query = self.query_string().unwrap_or("");
        serde_urlencoded::from_str(query)
            .map_err(|e| FrameworkError::invalid_body(format!("Failed to parse query: {}", e)))
    }

    /// Get a header value by name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Get the Content-Type header
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
    }

    /// Whether the body is an HTML form submission
    pub fn is_form(&self) -> bool {
        self.content_type()
            .map(|ct| ct.starts_with("application/x-www-form-urlencoded"))
            .unwrap_or(false)
    }

    /// Get shared state attached to the router with `Router::with_state`
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// pub async fn index(req: Request) -> Response {
    ///     let state = req.state::<AppState>()?;
    ///     // ...
    /// }
    /// ```
    pub fn state<T: Clone + Send + Sync + 'static>(&self) -> Result<T, FrameworkError> {
        self.parts
            .extensions
            .get::<T>()
            .cloned()
            .ok_or_else(FrameworkError::state_not_found::<T>)
    }

    /// Mutable access to request extensions (used by the router to attach state)
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.parts.extensions
    }

    /// The raw body bytes
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Read the body as a record, whatever its encoding
    ///
    /// Form fields become string values; an empty body is an empty record;
    /// a JSON body that is not an object is rejected.
    pub fn record(&self) -> Result<Record, FrameworkError> {
        if self.is_form() {
            parse_form_record(&self.body)
        } else {
            parse_json_record(&self.body)
        }
    }
}

/// Parse a path segment as a record id
pub fn parse_id(raw: &str) -> Result<i64, FrameworkError> {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(FrameworkError::invalid_id(raw));
    }
    raw.parse().map_err(|_| FrameworkError::invalid_id(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str, content_type: Option<&str>, body: &'static str) -> Request {
        let mut builder = http::Request::builder().method("POST").uri(uri);
        if let Some(ct) = content_type {
            builder = builder.header("content-type", ct);
        }
        Request::from_http(builder.body(Bytes::from_static(body.as_bytes())).unwrap())
    }

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("-3").unwrap(), -3);
        for bad in ["", "abc", "12abc", "+1", "1.5", " 1", "-", "99999999999999999999"] {
            assert!(
                matches!(parse_id(bad), Err(FrameworkError::InvalidId { .. })),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_id_param_reports_raw_value() {
        let mut params = HashMap::new();
        params.insert("id".to_string(), "abc".to_string());
        let req = request("/api/users/abc", None, "").with_params(params);

        let err = req.id_param("id").unwrap_err();
        assert_eq!(err.to_string(), "Invalid id:abc");
    }

    #[test]
    fn test_missing_param_is_param_error() {
        let req = request("/", None, "");
        assert!(matches!(
            req.id_param("id"),
            Err(FrameworkError::ParamError { .. })
        ));
    }

    #[test]
    fn test_query() {
        #[derive(serde::Deserialize)]
        struct Q {
            id: Option<String>,
        }

        let req = request("/products/phones?id=3", None, "");
        assert_eq!(req.query::<Q>().unwrap().id.as_deref(), Some("3"));

        let req = request("/products/phones", None, "");
        assert!(req.query::<Q>().unwrap().id.is_none());
    }

    #[test]
    fn test_record_follows_content_type() {
        let req = request(
            "/",
            Some("application/x-www-form-urlencoded"),
            "name=Pixel",
        );
        assert_eq!(req.record().unwrap()["name"], "Pixel");

        let req = request("/", Some("application/json"), r#"{"name":"Pixel"}"#);
        assert_eq!(req.record().unwrap()["name"], "Pixel");
    }

    #[test]
    fn test_missing_state_is_an_error() {
        let req = request("/", None, "");
        assert!(matches!(
            req.state::<String>(),
            Err(FrameworkError::StateNotFound { .. })
        ));
    }
}
