//! Route handlers and type erasure.
//!
//! The router stores every route target as a [`BoxedHandler`], whatever its
//! concrete type: a plain `async fn(Request) -> impl IntoResponse` registered
//! with [`Router::on`](crate::Router::on), or the dispatcher the resource
//! binder builds for each handler method.
//!
//! ```text
//! async fn health(req: Request) -> Response { … }   ← plain handler
//!        ↓ router.on(Method::Get, "/healthz", health)
//! Arc::new(FnHandler(health))                      ← BoxedHandler
//!
//! fn get(&self, name: String) -> Reply { … }        ← resource method
//!        ↓ resource::bind(&mut router, res, "/samples")
//! Arc::new(Dispatcher { .. })                      ← BoxedHandler
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased future resolving to `T`.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Internal dispatch interface shared by every route target.
///
/// `#[doc(hidden)] pub` because it appears in [`Engine`](crate::Engine)'s
/// signature; applications never implement it.
#[doc(hidden)]
pub trait ErasedHandler {
    fn call(&self, req: Request) -> BoxFuture<Response>;
}

/// A type-erased handler shared across concurrent requests.
#[doc(hidden)]
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

/// Implemented for every plain route handler:
///
/// ```text
/// async fn name(req: Request) -> impl IntoResponse
/// ```
///
/// Sealed: only the blanket impl below satisfies it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, req: Request) -> BoxFuture<Response> {
        let fut = (self.0)(req);
        Box::pin(async move { fut.await.into_response() })
    }
}
