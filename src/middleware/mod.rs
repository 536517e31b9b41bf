//! Per-verb request interceptors.
//!
//! An interceptor runs before the route handler and decides whether the
//! request goes on:
//!
//! ```rust
//! use std::ops::ControlFlow;
//! use http::StatusCode;
//! use verbum::{Request, Response};
//!
//! async fn require_token(req: Request) -> ControlFlow<Response, Request> {
//!     match req.header("authorization") {
//!         Some(_) => ControlFlow::Continue(req),
//!         None => ControlFlow::Break(Response::message(StatusCode::UNAUTHORIZED, "missing token")),
//!     }
//! }
//! ```
//!
//! `Continue` hands the (possibly modified) request to the next interceptor,
//! and after the last one to the handler. `Break` ends the chain: later
//! interceptors and the handler never run, and the returned response is the
//! one sent.
//!
//! Resources attach interceptors per verb through a [`Middlewares`] table.

mod table;

pub use table::Middlewares;

use std::future::Future;
use std::ops::ControlFlow;
use std::sync::Arc;

use tracing::debug;

use crate::handler::{BoxFuture, BoxedHandler};
use crate::request::Request;
use crate::response::Response;

/// What an interceptor decides: go on with a request, or answer now.
pub type Flow = ControlFlow<Response, Request>;

#[doc(hidden)]
pub trait ErasedInterceptor {
    fn intercept(&self, req: Request) -> BoxFuture<Flow>;
}

/// A type-erased interceptor, shared by every route it is attached to.
pub type BoxedInterceptor = Arc<dyn ErasedInterceptor + Send + Sync + 'static>;

/// Implemented for every `async fn(Request) -> ControlFlow<Response, Request>`.
pub trait Interceptor: Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_interceptor(self) -> BoxedInterceptor;
}

impl<F, Fut> Interceptor for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Flow> + Send + 'static,
{
    fn into_boxed_interceptor(self) -> BoxedInterceptor {
        Arc::new(FnInterceptor(self))
    }
}

struct FnInterceptor<F>(F);

impl<F, Fut> ErasedInterceptor for FnInterceptor<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Flow> + Send + 'static,
{
    fn intercept(&self, req: Request) -> BoxFuture<Flow> {
        Box::pin((self.0)(req))
    }
}

/// Runs `interceptors` in order, then `handler` unless one of them broke off.
pub(crate) async fn run_chain(
    interceptors: Arc<[BoxedInterceptor]>,
    handler: BoxedHandler,
    mut req: Request,
) -> Response {
    for interceptor in interceptors.iter() {
        match interceptor.intercept(req).await {
            ControlFlow::Continue(next) => req = next,
            ControlFlow::Break(res) => return res,
        }
    }
    handler.call(req).await
}

/// Logs method and path at debug level; never short-circuits.
pub async fn trace(req: Request) -> Flow {
    debug!(method = %req.method(), path = req.path(), "request");
    ControlFlow::Continue(req)
}
