//! Rust argument types a handler method may declare.

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::request::Request;

use super::coerce::Arg;
use super::signature::ParamType;

/// A handler-method parameter type.
///
/// | Rust type  | Declared as | Source                  |
/// |------------|-------------|-------------------------|
/// | `String`   | `string`    | path segment            |
/// | `i64`      | `int`       | path segment            |
/// | `f64`      | `float`     | path segment            |
/// | `bool`     | `bool`      | path segment            |
/// | `Request`  | context     | the request itself      |
/// | `Json<T>`  | record      | JSON body, at most one  |
pub trait Param: Sized + Send + 'static {
    fn declared() -> ParamType;

    /// Takes the value back out of a coerced argument. Hands the argument
    /// back when it holds something else.
    fn from_arg(arg: Arg) -> Result<Self, Arg>;
}

impl Param for String {
    fn declared() -> ParamType { ParamType::Str }

    fn from_arg(arg: Arg) -> Result<Self, Arg> {
        match arg {
            Arg::Str(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl Param for i64 {
    fn declared() -> ParamType { ParamType::Int }

    fn from_arg(arg: Arg) -> Result<Self, Arg> {
        match arg {
            Arg::Int(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl Param for f64 {
    fn declared() -> ParamType { ParamType::Float }

    fn from_arg(arg: Arg) -> Result<Self, Arg> {
        match arg {
            Arg::Float(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl Param for bool {
    fn declared() -> ParamType { ParamType::Bool }

    fn from_arg(arg: Arg) -> Result<Self, Arg> {
        match arg {
            Arg::Bool(v) => Ok(v),
            other => Err(other),
        }
    }
}

impl Param for Request {
    fn declared() -> ParamType { ParamType::Context }

    fn from_arg(arg: Arg) -> Result<Self, Arg> {
        match arg {
            Arg::Context(req) => Ok(req),
            other => Err(other),
        }
    }
}

/// A JSON payload.
///
/// As a parameter it is the decoded request body; as a return value it is
/// serialised into the response body.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned + Send + 'static> Param for Json<T> {
    fn declared() -> ParamType { ParamType::record::<T>() }

    fn from_arg(arg: Arg) -> Result<Self, Arg> {
        match arg {
            Arg::Body(body) => body.downcast::<T>().map(|value| Json(*value)).map_err(Arg::Body),
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Data {
        name: String,
    }

    #[test]
    fn primitives_declare_path_types() {
        assert!(matches!(String::declared(), ParamType::Str));
        assert!(matches!(i64::declared(), ParamType::Int));
        assert!(matches!(f64::declared(), ParamType::Float));
        assert!(matches!(bool::declared(), ParamType::Bool));
        assert!(matches!(Request::declared(), ParamType::Context));
        assert!(matches!(Json::<Data>::declared(), ParamType::Record(r) if r.name().ends_with("Data")));
    }

    #[test]
    fn mismatched_arg_is_handed_back() {
        assert!(matches!(i64::from_arg(Arg::Str("1".into())), Err(Arg::Str(_))));
        assert_eq!(i64::from_arg(Arg::Int(7)).unwrap(), 7);
    }

    #[test]
    fn json_takes_only_its_own_record() {
        let arg = Arg::Body(Box::new(Data { name: "x".into() }));
        assert_eq!(Json::<Data>::from_arg(arg).unwrap(), Json(Data { name: "x".into() }));

        let wrong = Arg::Body(Box::new(5_u8));
        assert!(matches!(Json::<Data>::from_arg(wrong), Err(Arg::Body(_))));
    }
}
