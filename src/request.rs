//! Incoming HTTP request type.
//!
//! This is the request context a handler method receives when it declares a
//! [`Request`] parameter, and what interceptors inspect and pass along.

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use http::{Extensions, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;

use crate::error::ApplicationError;
use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
///
/// Cloning is cheap for the body and path parameters; headers and
/// extensions are copied.
#[derive(Clone, Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Bytes,
    params: Arc<HashMap<String, String>>,
    extensions: Extensions,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
            params: Arc::default(),
            extensions: Extensions::new(),
        }
    }

    pub(crate) fn from_parts(
        method: Method,
        path: String,
        headers: HeaderMap,
        extensions: Extensions,
        body: Bytes,
    ) -> Self {
        Self { method, path, headers, body, params: Arc::default(), extensions }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub(crate) fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = Arc::new(params);
        self
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn extensions(&self) -> &Extensions { &self.extensions }

    /// Header lookup. Names are case-insensitive; non-UTF-8 values read as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter, or `""` when the route has none by that name.
    ///
    /// For a route `/users/:int1`, `req.param("int1")` on `/users/42` returns `"42"`.
    pub fn param(&self, name: &str) -> &str {
        self.params.get(name).map_or("", String::as_str)
    }

    /// Decodes the body as JSON into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApplicationError> {
        serde_json::from_slice(&self.body).map_err(|e| ApplicationError::bad_request(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Data {
        name: String,
    }

    #[test]
    fn missing_param_is_empty() {
        let req = Request::new(Method::Get, "/samples")
            .with_params(HashMap::from([("string1".to_owned(), "alice".to_owned())]));
        assert_eq!(req.param("string1"), "alice");
        assert_eq!(req.param("int2"), "");
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = Request::new(Method::Get, "/")
            .with_header(header::AUTHORIZATION, HeaderValue::from_static("Bearer t"));
        assert_eq!(req.header("Authorization"), Some("Bearer t"));
        assert_eq!(req.header("x-missing"), None);
    }

    #[test]
    fn json_decodes_body() {
        let req = Request::new(Method::Post, "/").with_body(r#"{"name":"bob"}"#);
        assert_eq!(req.json::<Data>().unwrap(), Data { name: "bob".into() });
    }

    #[test]
    fn json_failure_is_bad_request() {
        let req = Request::new(Method::Post, "/").with_body("not json");
        let err = req.json::<Data>().unwrap_err();
        assert!(matches!(err, ApplicationError::BadRequest(_)));
    }
}
