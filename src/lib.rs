//! # verbum
//!
//! Resource binding for HTTP services: name a method after an HTTP verb and
//! it becomes a route. No route table to maintain.
//!
//! ## The convention
//!
//! A handler object implements [`Resource`] by listing its methods. Every
//! method named `Get`, `Post`, `Put`, `Patch`, `Delete` (any case; `Head`,
//! `Options`, `Connect` and `Trace` too) is bound. Its parameters shape the
//! path, its return value shapes the response:
//!
//! - `String`, `i64`, `f64`, `bool` → one path segment each, `/:string1`, `/:int2`, …
//! - [`Request`] → the request context, no segment
//! - [`Json<T>`] → the decoded JSON body, no segment, at most one
//! - returns `()` → `200` empty; one value → `200` + body; `(value, status)` → that status
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use serde::{Deserialize, Serialize};
//! use serde_json::{json, Value};
//! use verbum::{Api, Json, Request, Resource, Router, Routes, Server};
//!
//! #[derive(Deserialize, Serialize)]
//! struct Data {
//!     name: String,
//! }
//!
//! struct Samples;
//!
//! impl Samples {
//!     // GET /samples/:string1
//!     fn get(&self, name: String) -> (Value, u16) {
//!         (json!({ "name": name }), 200)
//!     }
//!
//!     // POST /samples
//!     fn post(&self, _req: Request, data: Json<Data>) -> (Json<Data>, StatusCode) {
//!         (data, StatusCode::OK)
//!     }
//! }
//!
//! impl Resource for Samples {
//!     fn routes() -> Routes<Self> {
//!         Routes::new().method("Get", Self::get).method("Post", Self::post)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), verbum::Error> {
//!     let mut router = Router::new();
//!     Api::new("/").resource("/samples", Samples).register(&mut router)?;
//!
//!     Server::bind("0.0.0.0:3000")?.serve(router).await
//! }
//! ```
//!
//! ## Failures
//!
//! - A method whose parameters cannot be bound (two bodies, an unsupported
//!   type) is rejected at registration and reported in [`Bound::rejected`];
//!   the resource's other methods still bind.
//! - A path value that does not parse, or a body that does not decode,
//!   answers `400 {"message": "..."}` and the method is not called.

mod config;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;

pub mod middleware;
pub mod resource;

pub use config::ServerConfig;
pub use error::{ApplicationError, Error, SignatureError};
pub use handler::Handler;
pub use method::Method;
pub use middleware::{Interceptor, Middlewares};
pub use request::Request;
pub use resource::{bind, Api, Bound, IntoReply, Json, Reply, Resource, Route, Routes};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::{Engine, Router};
pub use server::Server;

#[doc(hidden)]
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler};
