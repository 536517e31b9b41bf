//! Resources: handler objects whose verb-named methods become routes.
//!
//! # Route shape
//!
//! A method's parameter list decides its path. Path-typed parameters become
//! placeholders named `<type><position>`, the request context and the JSON
//! body add nothing:
//!
//! | Method                                               | Route under `/samples`       |
//! |------------------------------------------------------|------------------------------|
//! | `fn get(&self, name: String)`                        | `GET /samples/:string1`      |
//! | `fn put(&self, id: i64, on: bool)`                   | `PUT /samples/:int1/:bool2`  |
//! | `fn post(&self, req: Request, body: Json<Data>)`     | `POST /samples`              |
//! | `fn delete(&self, req: Request, id: i64)`            | `DELETE /samples/:int2`      |
//!
//! # Request time
//!
//! Interceptors registered for the verb run first. Then each argument is
//! coerced: `int`/`float` parse failures and undecodable bodies answer
//! `400 {"message": ...}` without calling the method. `bool` is permissive:
//! only `""`, `false`, `0`, `null`, `nil` and `off` are false.
//!
//! The method's return value picks status and body, see [`IntoReply`].

mod binder;
mod coerce;
mod dispatch;
mod param;
mod reply;
mod route;
mod signature;

pub use binder::{bind, Api, Bound, Rejected};
pub use coerce::{coerce, parse_bool, Arg};
pub use param::{Json, Param};
pub use reply::{Body, IntoReply, Reply};
pub use route::{Operation, Route, Routes};
pub use signature::{analyze, ArgumentSlot, ParamType, RecordType, RouteTemplate, Segment, SlotKind};

use crate::middleware::Middlewares;

/// A handler object.
///
/// `routes` lists its methods; every one whose name is an HTTP verb
/// (`"Get"`, `"post"`, …) is bound. `middleware` optionally supplies
/// per-verb interceptors; the default has none.
///
/// ```rust
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// use serde::{Deserialize, Serialize};
/// use verbum::{Json, Request, Resource, Routes};
///
/// #[derive(Clone, Deserialize, Serialize)]
/// struct Sample {
///     message: String,
/// }
///
/// #[derive(Default)]
/// struct Samples {
///     store: Mutex<HashMap<String, Sample>>,
/// }
///
/// impl Samples {
///     fn get(&self, id: String) -> (Json<Option<Sample>>, u16) {
///         let found = self.store.lock().unwrap().get(&id).cloned();
///         let status = if found.is_some() { 200 } else { 404 };
///         (Json(found), status)
///     }
///
///     fn put(&self, id: String, _req: Request, sample: Json<Sample>) -> (&'static str, u16) {
///         self.store.lock().unwrap().insert(id, sample.into_inner());
///         ("", 204)
///     }
/// }
///
/// impl Resource for Samples {
///     fn routes() -> Routes<Self> {
///         Routes::new().method("Get", Self::get).method("Put", Self::put)
///     }
/// }
/// ```
pub trait Resource: Send + Sync + Sized + 'static {
    fn routes() -> Routes<Self>;

    fn middleware(&self) -> Option<&Middlewares> {
        None
    }
}
