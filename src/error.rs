//! Error types.
//!
//! Three families, one per phase of a route's life:
//!
//! - [`Error`] surfaces infrastructure failures: binding a socket, inserting
//!   a route into the router, reading configuration.
//! - [`SignatureError`] is raised at registration time when a handler
//!   method's parameter list cannot be turned into a route. It rejects that
//!   one method, never the whole resource.
//! - [`ApplicationError`] is raised at request time. It never escapes the
//!   dispatcher: it becomes a `{"message": ...}` JSON response.

use http::StatusCode;

use crate::method::Method;

/// The error type returned by verbum's fallible infrastructure operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{addr}`: {source}")]
    Addr {
        addr: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("invalid route {method} `{path}`: {source}")]
    Route {
        method: Method,
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    #[error("config: {0}")]
    Config(String),
}

/// A handler method whose parameter list cannot be bound.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SignatureError {
    #[error("unsupported parameter type `{ty}` at position {ordinal}")]
    Unsupported { ty: &'static str, ordinal: usize },

    #[error("only one body parameter is allowed, found one at position {first} and another at {second}")]
    MultipleBodies { first: usize, second: usize },
}

/// A request-time failure, converted into a JSON error response.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ApplicationError {
    /// The client sent something that could not be coerced. Always 400.
    #[error("{0}")]
    BadRequest(String),

    /// Anything else. Without an explicit status this is a 500.
    #[error("{message}")]
    Failure {
        message: String,
        status: Option<StatusCode>,
    },
}

impl ApplicationError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// A failure with no status of its own; answered with `500`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self::Failure { message: message.into(), status: None }
    }

    pub fn with_status(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Failure { message: message.into(), status: Some(status) }
    }

    /// The status carried by the error, if any.
    pub fn carried_status(&self) -> Option<StatusCode> {
        match self {
            Self::BadRequest(_) => Some(StatusCode::BAD_REQUEST),
            Self::Failure { status, .. } => *status,
        }
    }

    /// The status the response is sent with.
    pub fn status(&self) -> StatusCode {
        self.carried_status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}
