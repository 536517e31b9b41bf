use std::any::type_name;
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::ServerConfig;
use crate::error::{Error, SignatureError};
use crate::method::Method;
use crate::router::Engine;

use super::Resource;
use super::dispatch::Dispatcher;
use super::signature::analyze;

/// What [`bind`] registered, and what it refused.
#[derive(Debug, Default)]
pub struct Bound {
    /// Registered routes, in method-table order.
    pub routes: Vec<(Method, String)>,
    /// Verb-named methods whose parameter list could not be bound.
    pub rejected: Vec<Rejected>,
}

impl Bound {
    /// `true` when no verb-named method was rejected.
    pub fn is_complete(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// A handler method refused at registration time.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rejected {
    pub method: String,
    pub error: SignatureError,
}

/// Registers every verb-named method of `resource` on `engine`, under `prefix`.
///
/// Methods whose name is not an HTTP verb are skipped. A method with an
/// unbindable parameter list is logged, reported in [`Bound::rejected`] and
/// skipped; the rest still register. Engine failures, such as binding the
/// same prefix twice, abort with [`Error::Route`].
pub fn bind<R, E>(engine: &mut E, resource: Arc<R>, prefix: &str) -> Result<Bound, Error>
where
    R: Resource,
    E: Engine + ?Sized,
{
    let mut bound = Bound::default();

    for route in R::routes() {
        let Some(verb) = Method::from_name(route.name()) else {
            debug!(resource = type_name::<R>(), method = route.name(), "not a verb, skipped");
            continue;
        };

        let (template, slots) = match analyze(route.params()) {
            Ok(plan) => plan,
            Err(e) => {
                error!(resource = type_name::<R>(), method = route.name(), "handler method rejected: {e}");
                bound.rejected.push(Rejected { method: route.name().to_owned(), error: e });
                continue;
            }
        };

        let path = template.mounted_at(prefix).to_path();
        let interceptors = resource
            .middleware()
            .map(|table| table.lookup(verb.as_str()))
            .unwrap_or_default();
        let dispatcher = Dispatcher::new(Arc::clone(&resource), verb, slots, route.invoker());

        engine.register_route(verb, &path, interceptors, Arc::new(dispatcher))?;
        info!(%verb, %path, resource = type_name::<R>(), "route bound");
        bound.routes.push((verb, path));
    }

    Ok(bound)
}

type Deferred = Box<dyn FnOnce(&mut dyn Engine, &str) -> Result<Bound, Error> + Send>;

/// A set of resources mounted under one prefix, bound to an engine later.
///
/// ```rust
/// use verbum::{Api, Reply, Resource, Router, Routes};
///
/// struct Samples;
///
/// impl Samples {
///     fn get(&self, name: String) -> Reply { Reply::ok(&name) }
/// }
///
/// impl Resource for Samples {
///     fn routes() -> Routes<Self> {
///         Routes::new().method("Get", Self::get)
///     }
/// }
///
/// let mut router = Router::new();
/// let bound = Api::new("/api/v1").resource("/samples", Samples).register(&mut router)?;
/// assert_eq!(bound[0].routes[0].1, "/api/v1/samples/:string1");
/// # Ok::<(), verbum::Error>(())
/// ```
pub struct Api {
    prefix: String,
    pending: Vec<Deferred>,
}

impl Api {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), pending: Vec::new() }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(config.prefix.clone())
    }

    /// Queues `resource` to be mounted at `prefix + url`.
    pub fn resource<R: Resource>(mut self, url: &str, resource: R) -> Self {
        let url = url.to_owned();
        self.pending.push(Box::new(move |engine: &mut dyn Engine, prefix: &str| {
            bind(engine, Arc::new(resource), &format!("{prefix}/{url}"))
        }));
        self
    }

    /// Binds every queued resource, in the order they were added.
    pub fn register<E: Engine>(self, engine: &mut E) -> Result<Vec<Bound>, Error> {
        let engine: &mut dyn Engine = engine;
        let mut bound = Vec::with_capacity(self.pending.len());
        for deferred in self.pending {
            bound.push(deferred(&mut *engine, &self.prefix)?);
        }
        Ok(bound)
    }
}
