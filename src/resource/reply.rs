//! What a handler method returns, and how it becomes a response.

use bytes::Bytes;
use http::StatusCode;
use serde::Serialize;

use crate::error::ApplicationError;
use crate::response::Response;

use super::param::Json;

/// A response body before it is written.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Body {
    Empty,
    Json(Bytes),
    Text(String),
}

impl Body {
    /// Serialises `value` as JSON.
    ///
    /// A value that serialises to a bare JSON string is plain text and is
    /// kept unwrapped.
    ///
    /// A value serde_json refuses is not written at all: the client gets a
    /// text body holding serde_json's error message (e.g. `key must be a
    /// string`), still under the handler's status.
    pub fn format<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(bytes) if bytes.first() == Some(&b'"') => match serde_json::from_slice(&bytes) {
                Ok(text) => Self::Text(text),
                Err(_) => Self::Json(bytes.into()),
            },
            Ok(bytes) => Self::Json(bytes.into()),
            Err(e) => Self::Text(e.to_string()),
        }
    }
}

/// The result of a handler method: a body and a status, `200` unless set.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Reply {
    body: Body,
    status: StatusCode,
}

impl Reply {
    /// `200`, no body.
    pub fn empty() -> Self {
        Self { body: Body::Empty, status: StatusCode::OK }
    }

    /// `200` with `value` as body.
    pub fn ok<T: Serialize + ?Sized>(value: &T) -> Self {
        Self::new(value, StatusCode::OK)
    }

    pub fn new<T: Serialize + ?Sized>(value: &T, status: StatusCode) -> Self {
        Self { body: Body::format(value), status }
    }

    pub fn text(text: impl Into<String>, status: StatusCode) -> Self {
        Self { body: Body::Text(text.into()), status }
    }

    pub fn body(&self) -> &Body { &self.body }
    pub fn status(&self) -> StatusCode { self.status }

    pub(crate) fn into_response(self) -> Response {
        match self.body {
            Body::Empty => Response::empty(self.status),
            Body::Json(bytes) => Response::builder().status(self.status).json(bytes),
            Body::Text(text) => Response::text(self.status, text),
        }
    }
}

impl Default for Reply {
    fn default() -> Self {
        Self::empty()
    }
}

/// Return types a handler method may have.
///
/// - `()` → `200`, empty body
/// - `StatusCode` → that status, empty body
/// - `Json<T>`, `String`, `&'static str`, `Reply` → `200` (or the reply's status)
/// - `(T, u16)` / `(T, StatusCode)` → the given status, `T` as body
/// - `Result<T, E>` → `T` as above; `E` becomes a `{"message": ..}` error response
pub trait IntoReply {
    fn into_reply(self) -> Result<Reply, ApplicationError>;
}

impl IntoReply for () {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(Reply::empty())
    }
}

impl IntoReply for StatusCode {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(Reply { body: Body::Empty, status: self })
    }
}

impl IntoReply for Reply {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(self)
    }
}

impl<T: Serialize> IntoReply for Json<T> {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(Reply::ok(&self.0))
    }
}

impl IntoReply for String {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(Reply::text(self, StatusCode::OK))
    }
}

impl IntoReply for &'static str {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(Reply::text(self, StatusCode::OK))
    }
}

impl<T: Serialize> IntoReply for (T, StatusCode) {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        Ok(Reply::new(&self.0, self.1))
    }
}

impl<T: Serialize> IntoReply for (T, u16) {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        let status = StatusCode::from_u16(self.1)
            .map_err(|_| ApplicationError::failure(format!("invalid status code {}", self.1)))?;
        Ok(Reply::new(&self.0, status))
    }
}

impl<T: IntoReply, E: Into<ApplicationError>> IntoReply for Result<T, E> {
    fn into_reply(self) -> Result<Reply, ApplicationError> {
        self.map_err(Into::into)?.into_reply()
    }
}
