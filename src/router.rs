//! Radix-tree request router and the [`Engine`] seam.
//!
//! One matchit tree per HTTP method. Each route carries the interceptor
//! chain that runs in front of its handler.

use std::collections::HashMap;
use std::sync::Arc;

use http::StatusCode;
use matchit::Router as MatchitRouter;
use percent_encoding::percent_decode_str;
use tracing::debug;

use crate::error::Error;
use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::{self, BoxedInterceptor};
use crate::request::Request;
use crate::response::Response;

/// The route-registration capability the resource binder consumes.
pub trait Engine {
    /// Registers `handler` for `method` + `path`, guarded by `interceptors`
    /// which run first, in order.
    ///
    /// `path` uses `:name` placeholders. Conflicting or malformed paths are
    /// reported as [`Error::Route`].
    fn register_route(
        &mut self,
        method: Method,
        path: &str,
        interceptors: Vec<BoxedInterceptor>,
        handler: BoxedHandler,
    ) -> Result<(), Error>;
}

#[derive(Clone)]
struct Route {
    interceptors: Arc<[BoxedInterceptor]>,
    handler: BoxedHandler,
}

/// The application router.
///
/// Build it once at startup, bind resources onto it, pass it to
/// [`Server::serve`](crate::Server::serve).
#[derive(Default)]
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Route>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plain handler for a method + path pair. Returns `self` for chaining.
    ///
    /// ```rust
    /// # use verbum::{Method, Request, Response, Router};
    /// # use http::StatusCode;
    /// async fn liveness(_: Request) -> Response { Response::text(StatusCode::OK, "ok") }
    ///
    /// let router = Router::new().on(Method::Get, "/healthz", liveness)?;
    /// # Ok::<(), verbum::Error>(())
    /// ```
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Result<Self, Error> {
        self.register_route(method, path, Vec::new(), handler.into_boxed_handler())?;
        Ok(self)
    }

    /// Routes one request through its interceptors and handler.
    ///
    /// `404` when no tree knows the path, `405` when only other methods do.
    /// Path parameters reach the handler percent-decoded; a value that does
    /// not decode to UTF-8 answers `400`.
    pub async fn handle(&self, req: Request) -> Response {
        let method = req.method();
        let Some((route, params)) = self.lookup(method, req.path()) else {
            let status = if self.allows_other_method(method, req.path()) {
                StatusCode::METHOD_NOT_ALLOWED
            } else {
                StatusCode::NOT_FOUND
            };
            debug!(%method, path = req.path(), %status, "no route");
            return Response::empty(status);
        };
        let params = match params {
            Ok(params) => params,
            Err(name) => {
                debug!(%method, path = req.path(), param = %name, "undecodable path parameter");
                return Response::message(
                    StatusCode::BAD_REQUEST,
                    format!("path parameter {name} is not valid UTF-8"),
                );
            }
        };
        middleware::run_chain(route.interceptors, route.handler, req.with_params(params)).await
    }

    /// The matched route and its decoded parameters. A parameter that fails
    /// to decode is reported by name.
    fn lookup(&self, method: Method, path: &str) -> Option<(Route, Result<HashMap<String, String>, String>)> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| match percent_decode_str(v).decode_utf8() {
                Ok(value) => Ok((k.to_owned(), value.into_owned())),
                Err(_) => Err(k.to_owned()),
            })
            .collect();
        Some((matched.value.clone(), params))
    }

    fn allows_other_method(&self, method: Method, path: &str) -> bool {
        self.routes.iter().any(|(m, tree)| *m != method && tree.at(path).is_ok())
    }
}

impl Engine for Router {
    fn register_route(
        &mut self,
        method: Method,
        path: &str,
        interceptors: Vec<BoxedInterceptor>,
        handler: BoxedHandler,
    ) -> Result<(), Error> {
        let route = Route { interceptors: interceptors.into(), handler };
        self.routes
            .entry(method)
            .or_default()
            .insert(to_matchit(path), route)
            .map_err(|source| Error::Route { method, path: path.to_owned(), source })
    }
}

/// Rewrites `:name` segments into matchit's `{name}` syntax.
fn to_matchit(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment.strip_prefix(':') {
            Some(name) => format!("{{{name}}}"),
            None => segment.to_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
}
