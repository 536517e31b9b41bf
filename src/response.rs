//! Outgoing HTTP response type and the [`IntoResponse`] conversion trait.
//!
//! Handler methods bound through a resource never build a [`Response`]
//! themselves; they return a [`Reply`](crate::Reply) and the dispatcher
//! turns it into one. Interceptors and plain router handlers build responses
//! directly.

use bytes::Bytes;
use http::header::{self, HeaderMap, HeaderName, HeaderValue};
use http::StatusCode;
use http_body_util::Full;
use serde::Serialize;

use crate::error::ApplicationError;

// ── ContentType ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
enum ContentType {
    Json,
    Text,
}

impl ContentType {
    fn header_value(self) -> HeaderValue {
        HeaderValue::from_static(match self {
            Self::Json => "application/json",
            Self::Text => "text/plain; charset=utf-8",
        })
    }
}

// ── Response ─────────────────────────────────────────────────────────────────

/// An outgoing HTTP response.
///
/// ```rust
/// use http::StatusCode;
/// use verbum::Response;
///
/// Response::json(StatusCode::OK, &serde_json::json!({"id": 1}));
/// Response::text(StatusCode::OK, "hello");
/// Response::empty(StatusCode::NO_CONTENT);
/// Response::message(StatusCode::UNAUTHORIZED, "missing token");
/// ```
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    /// `application/json` body serialised from `value`.
    ///
    /// A value serde_json cannot serialise produces a `500` carrying the
    /// serialiser's message instead.
    pub fn json<T: Serialize + ?Sized>(status: StatusCode, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) => Self::builder().status(status).json(bytes),
            Err(e) => Self::message(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    }

    /// `text/plain; charset=utf-8` body.
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::builder().status(status).text(body)
    }

    /// Response with no body.
    pub fn empty(status: StatusCode) -> Self {
        Self { status, headers: HeaderMap::new(), body: Bytes::new() }
    }

    /// The JSON error shape used for every failure: `{"message": "..."}`.
    pub fn message(status: StatusCode, message: impl Into<String>) -> Self {
        let body = serde_json::json!({ "message": message.into() });
        Self::builder().status(status).json(body.to_string().into_bytes())
    }

    /// Builder for responses that need extra headers.
    pub fn builder() -> ResponseBuilder {
        ResponseBuilder { headers: HeaderMap::new(), status: StatusCode::OK }
    }

    pub fn status(&self) -> StatusCode { self.status }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// The `content-type` header, if one was set.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(header::CONTENT_TYPE).and_then(|v| v.to_str().ok())
    }

    pub(crate) fn into_http(self) -> http::Response<Full<Bytes>> {
        let mut res = http::Response::new(Full::new(self.body));
        *res.status_mut() = self.status;
        *res.headers_mut() = self.headers;
        res
    }
}

// ── ResponseBuilder ───────────────────────────────────────────────────────────

/// Fluent builder for [`Response`].
///
/// Obtain via [`Response::builder()`]. Defaults to `200 OK`.
/// Terminated by a typed body method.
pub struct ResponseBuilder {
    headers: HeaderMap,
    status: StatusCode,
}

impl ResponseBuilder {
    pub fn status(mut self, code: StatusCode) -> Self {
        self.status = code;
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Terminate with a JSON body (`application/json`).
    pub fn json(self, body: impl Into<Bytes>) -> Response {
        self.finish(ContentType::Json, body.into())
    }

    /// Terminate with a plain-text body (`text/plain; charset=utf-8`).
    pub fn text(self, body: impl Into<String>) -> Response {
        self.finish(ContentType::Text, Bytes::from(body.into()))
    }

    fn finish(mut self, content_type: ContentType, body: Bytes) -> Response {
        self.headers.insert(header::CONTENT_TYPE, content_type.header_value());
        Response { status: self.status, headers: self.headers, body }
    }
}

// ── IntoResponse ──────────────────────────────────────────────────────────────

/// Conversion into an HTTP [`Response`].
///
/// Plain router handlers and interceptors may return anything implementing
/// this trait.
pub trait IntoResponse {
    fn into_response(self) -> Response;
}

impl IntoResponse for Response {
    fn into_response(self) -> Response { self }
}

impl IntoResponse for &'static str {
    fn into_response(self) -> Response { Response::text(StatusCode::OK, self) }
}

impl IntoResponse for String {
    fn into_response(self) -> Response { Response::text(StatusCode::OK, self) }
}

/// Return a status directly: `return StatusCode::NOT_FOUND`
impl IntoResponse for StatusCode {
    fn into_response(self) -> Response { Response::empty(self) }
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response { Response::message(self.status(), self.to_string()) }
}
