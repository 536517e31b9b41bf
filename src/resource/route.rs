//! Handler-method descriptors.
//!
//! A [`Route`] names one method of a resource and carries what the binder
//! needs to route to it: the declared parameter types and an invoker.
//! Typed methods (`fn get(&self, name: String) -> Reply`) produce both from
//! their signature through [`Operation`]; [`Route::raw`] takes them
//! spelled out.

use std::any::type_name;
use std::borrow::Cow;
use std::sync::Arc;

use crate::error::ApplicationError;

use super::coerce::Arg;
use super::param::Param;
use super::reply::{IntoReply, Reply};
use super::signature::ParamType;

pub(crate) type Invoke<R> = dyn Fn(&R, Vec<Arg>) -> Result<Reply, ApplicationError> + Send + Sync;

/// One handler method of resource `R`.
pub struct Route<R> {
    name: Cow<'static, str>,
    params: Vec<ParamType>,
    invoke: Arc<Invoke<R>>,
}

impl<R: 'static> Route<R> {
    /// Describes a typed method; parameter types come from its signature.
    pub fn new<Args, M>(name: impl Into<Cow<'static, str>>, method: M) -> Self
    where
        M: Operation<R, Args>,
    {
        Self {
            name: name.into(),
            params: M::params(),
            invoke: Arc::new(move |resource: &R, args: Vec<Arg>| method.invoke(resource, args)),
        }
    }

    /// Describes a method from an explicit parameter list and an invoker
    /// taking the coerced arguments in declaration order.
    pub fn raw<F>(name: impl Into<Cow<'static, str>>, params: Vec<ParamType>, invoke: F) -> Self
    where
        F: Fn(&R, Vec<Arg>) -> Result<Reply, ApplicationError> + Send + Sync + 'static,
    {
        Self { name: name.into(), params, invoke: Arc::new(invoke) }
    }
}

impl<R> Route<R> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    pub(crate) fn invoker(&self) -> Arc<Invoke<R>> {
        Arc::clone(&self.invoke)
    }
}

/// The method table of a resource.
///
/// ```rust
/// use verbum::{Reply, Routes};
///
/// struct Samples;
///
/// impl Samples {
///     fn get(&self, name: String) -> Reply { Reply::ok(&name) }
///     fn delete(&self, _id: i64) {}
///     fn helper(&self) {}
/// }
///
/// let routes = Routes::new()
///     .method("Get", Samples::get)
///     .method("Delete", Samples::delete)
///     .method("helper", Samples::helper);  // listed, but not a verb: never routed
/// assert_eq!(routes.iter().count(), 3);
/// ```
pub struct Routes<R> {
    routes: Vec<Route<R>>,
}

impl<R: 'static> Routes<R> {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    pub fn method<Args, M>(mut self, name: impl Into<Cow<'static, str>>, method: M) -> Self
    where
        M: Operation<R, Args>,
    {
        self.routes.push(Route::new(name, method));
        self
    }

    pub fn route(mut self, route: Route<R>) -> Self {
        self.routes.push(route);
        self
    }
}

impl<R> Routes<R> {
    pub fn iter(&self) -> impl Iterator<Item = &Route<R>> {
        self.routes.iter()
    }
}

impl<R: 'static> Default for Routes<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> IntoIterator for Routes<R> {
    type Item = Route<R>;
    type IntoIter = std::vec::IntoIter<Route<R>>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

/// A method of `R` taking the parameters `Args`.
///
/// Implemented for every `Fn(&R, A1, .., An) -> impl IntoReply` with up to
/// eight [`Param`] arguments; `R`'s own `fn(&self, ..)` methods qualify.
pub trait Operation<R, Args>: Send + Sync + 'static {
    fn params() -> Vec<ParamType>;

    fn invoke(&self, resource: &R, args: Vec<Arg>) -> Result<Reply, ApplicationError>;
}

fn next_arg<T: Param>(
    args: &mut impl Iterator<Item = (usize, Arg)>,
) -> Result<T, ApplicationError> {
    let (index, arg) = args
        .next()
        .ok_or_else(|| ApplicationError::failure(format!("missing argument for {}", type_name::<T>())))?;
    T::from_arg(arg).map_err(|arg| {
        ApplicationError::failure(format!(
            "argument {} expected {}, got {arg:?}",
            index + 1,
            type_name::<T>(),
        ))
    })
}

macro_rules! impl_operation {
    ($($ty:ident),*) => {
        #[allow(non_snake_case, unused_mut, unused_variables)]
        impl<R, F, Out, $($ty,)*> Operation<R, ($($ty,)*)> for F
        where
            F: Fn(&R, $($ty),*) -> Out + Send + Sync + 'static,
            Out: IntoReply,
            $($ty: Param,)*
        {
            fn params() -> Vec<ParamType> {
                vec![$($ty::declared()),*]
            }

            fn invoke(&self, resource: &R, args: Vec<Arg>) -> Result<Reply, ApplicationError> {
                let mut args = args.into_iter().enumerate();
                $(let $ty = next_arg::<$ty>(&mut args)?;)*
                (self)(resource, $($ty),*).into_reply()
            }
        }
    };
}

impl_operation!();
impl_operation!(T1);
impl_operation!(T1, T2);
impl_operation!(T1, T2, T3);
impl_operation!(T1, T2, T3, T4);
impl_operation!(T1, T2, T3, T4, T5);
impl_operation!(T1, T2, T3, T4, T5, T6);
impl_operation!(T1, T2, T3, T4, T5, T6, T7);
impl_operation!(T1, T2, T3, T4, T5, T6, T7, T8);
