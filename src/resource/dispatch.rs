use std::sync::Arc;

use tracing::debug;

use crate::handler::{BoxFuture, ErasedHandler};
use crate::method::Method;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

use super::coerce::coerce;
use super::route::Invoke;
use super::signature::ArgumentSlot;

/// The route handler bound for one resource method.
///
/// By the time it runs, the router has already passed the request through
/// the method's interceptors. It coerces the arguments, invokes the method
/// and writes exactly one response.
pub(crate) struct Dispatcher<R> {
    resource: Arc<R>,
    verb: Method,
    slots: Vec<ArgumentSlot>,
    invoke: Arc<Invoke<R>>,
}

impl<R> Dispatcher<R> {
    pub(crate) fn new(
        resource: Arc<R>,
        verb: Method,
        slots: Vec<ArgumentSlot>,
        invoke: Arc<Invoke<R>>,
    ) -> Self {
        Self { resource, verb, slots, invoke }
    }

    pub(crate) fn dispatch(&self, req: &Request) -> Response {
        let args = match coerce(&self.slots, req) {
            Ok(args) => args,
            Err(e) => {
                debug!(verb = %self.verb, path = req.path(), status = %e.status(), "coercion failed: {e}");
                return e.into_response();
            }
        };

        match (self.invoke)(self.resource.as_ref(), args) {
            Ok(reply) => reply.into_response(),
            Err(e) => {
                debug!(verb = %self.verb, path = req.path(), status = %e.status(), "method failed: {e}");
                e.into_response()
            }
        }
    }
}

impl<R: Send + Sync> ErasedHandler for Dispatcher<R> {
    fn call(&self, req: Request) -> BoxFuture<Response> {
        Box::pin(std::future::ready(self.dispatch(&req)))
    }
}
