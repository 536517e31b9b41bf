use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{BoxedInterceptor, Interceptor};

/// Interceptors of one resource, keyed by verb.
///
/// Verbs are stored upper-cased, so `"get"`, `"Get"` and `"GET"` name the
/// same list. Lists keep registration order.
///
/// ```rust
/// use verbum::middleware::{self, Middlewares};
///
/// let mut table = Middlewares::new();
/// table.register("get", middleware::trace);
/// table.register_all(&["POST", "PUT"], middleware::trace);
/// assert_eq!(table.lookup("GET").len(), 1);
/// assert!(table.lookup("DELETE").is_empty());
/// ```
#[derive(Clone, Default)]
pub struct Middlewares {
    by_verb: HashMap<String, Vec<BoxedInterceptor>>,
}

impl Middlewares {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `interceptor` to the list for `verb`.
    pub fn register(&mut self, verb: &str, interceptor: impl Interceptor) -> &mut Self {
        self.push(verb, interceptor.into_boxed_interceptor());
        self
    }

    /// Appends the same `interceptor` to the list of every verb in `verbs`.
    pub fn register_all(&mut self, verbs: &[&str], interceptor: impl Interceptor) -> &mut Self {
        let boxed = interceptor.into_boxed_interceptor();
        for verb in verbs {
            self.push(verb, Arc::clone(&boxed));
        }
        self
    }

    /// The interceptors registered for `verb`, in registration order.
    pub fn lookup(&self, verb: &str) -> Vec<BoxedInterceptor> {
        self.by_verb.get(&canonical(verb)).cloned().unwrap_or_default()
    }

    fn push(&mut self, verb: &str, interceptor: BoxedInterceptor) {
        self.by_verb.entry(canonical(verb)).or_default().push(interceptor);
    }
}

impl fmt::Debug for Middlewares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (verb, list) in &self.by_verb {
            map.entry(verb, &list.len());
        }
        map.finish()
    }
}

fn canonical(verb: &str) -> String {
    verb.to_ascii_uppercase()
}
