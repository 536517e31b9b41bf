//! Request values into typed arguments.

use std::any::Any;
use std::fmt;

use crate::error::ApplicationError;
use crate::request::Request;

use super::signature::{ArgumentSlot, SlotKind};

/// One coerced argument, ready to hand to a handler method.
pub enum Arg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Context(Request),
    /// A decoded body; holds the slot's declared record type.
    Body(Box<dyn Any + Send>),
}

impl fmt::Debug for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(v)     => f.debug_tuple("Str").field(v).finish(),
            Self::Int(v)     => f.debug_tuple("Int").field(v).finish(),
            Self::Float(v)   => f.debug_tuple("Float").field(v).finish(),
            Self::Bool(v)    => f.debug_tuple("Bool").field(v).finish(),
            Self::Context(r) => f.debug_tuple("Context").field(&r.path()).finish(),
            Self::Body(_)    => f.write_str("Body(..)"),
        }
    }
}

/// Produces one argument per slot, in slot order.
///
/// Stops at the first slot that fails and returns its error.
pub fn coerce(slots: &[ArgumentSlot], req: &Request) -> Result<Vec<Arg>, ApplicationError> {
    slots.iter().map(|slot| coerce_slot(slot, req)).collect()
}

fn coerce_slot(slot: &ArgumentSlot, req: &Request) -> Result<Arg, ApplicationError> {
    match slot.kind() {
        SlotKind::PathString => Ok(Arg::Str(req.param(&slot.name()).to_owned())),
        SlotKind::PathInt => {
            let name = slot.name();
            req.param(&name)
                .parse()
                .map(Arg::Int)
                .map_err(|_| ApplicationError::bad_request(format!("argument {name} must be int")))
        }
        SlotKind::PathFloat => {
            let name = slot.name();
            req.param(&name)
                .parse()
                .map(Arg::Float)
                .map_err(|_| ApplicationError::bad_request(format!("argument {name} must be float")))
        }
        SlotKind::PathBool => Ok(Arg::Bool(parse_bool(req.param(&slot.name())))),
        SlotKind::RequestContext => Ok(Arg::Context(req.clone())),
        SlotKind::BodyStruct => {
            let record = slot.record().ok_or_else(|| {
                ApplicationError::failure(format!("argument {} has no body decoder", slot.name()))
            })?;
            record
                .decode(req.body())
                .map(Arg::Body)
                .map_err(|e| ApplicationError::bad_request(e.to_string()))
        }
    }
}

/// Permissive boolean: only `""`, `"false"`, `"0"`, `"null"`, `"nil"` and
/// `"off"` (exact, case-sensitive) are false. Everything else, `"no"`
/// included, is true.
pub fn parse_bool(raw: &str) -> bool {
    !matches!(raw, "" | "false" | "0" | "null" | "nil" | "off")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use http::StatusCode;
    use serde::Deserialize;

    use super::*;
    use crate::method::Method;
    use crate::resource::signature::{analyze, ParamType};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Data {
        name: String,
    }

    fn request(params: &[(&str, &str)]) -> Request {
        let params: HashMap<String, String> = params
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Request::new(Method::Get, "/").with_params(params)
    }

    fn slots(params: &[ParamType]) -> Vec<ArgumentSlot> {
        analyze(params).unwrap().1
    }

    #[test]
    fn false_literals() {
        for raw in ["", "false", "0", "null", "nil", "off"] {
            assert!(!parse_bool(raw), "{raw:?} should be false");
        }
    }

    #[test]
    fn everything_else_is_true() {
        for raw in ["1", "true", "no", "False", "OFF", "NULL", " ", "yes"] {
            assert!(parse_bool(raw), "{raw:?} should be true");
        }
    }

    #[test]
    fn path_values_are_typed() {
        let slots = slots(&[ParamType::Str, ParamType::Int, ParamType::Float, ParamType::Bool]);
        let req = request(&[("string1", "alice"), ("int2", "-42"), ("float3", "2.5"), ("bool4", "off")]);
        let args = coerce(&slots, &req).unwrap();
        assert!(matches!(&args[0], Arg::Str(s) if s == "alice"));
        assert!(matches!(args[1], Arg::Int(-42)));
        assert!(matches!(args[2], Arg::Float(f) if f == 2.5));
        assert!(matches!(args[3], Arg::Bool(false)));
    }

    #[test]
    fn bad_int_names_the_argument() {
        let slots = slots(&[ParamType::Int]);
        let err = coerce(&slots, &request(&[("int1", "notanumber")])).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "argument int1 must be int");
    }

    #[test]
    fn bad_float_names_the_argument() {
        let slots = slots(&[ParamType::Str, ParamType::Float]);
        let err = coerce(&slots, &request(&[("string1", "a"), ("float2", "x1")])).unwrap_err();
        assert_eq!(err.to_string(), "argument float2 must be float");
    }

    #[test]
    fn first_failure_wins() {
        let slots = slots(&[ParamType::Int, ParamType::Float]);
        let err = coerce(&slots, &request(&[("int1", "a"), ("float2", "b")])).unwrap_err();
        assert!(err.to_string().contains("int1"));
    }

    #[test]
    fn context_is_the_request() {
        let slots = slots(&[ParamType::Context]);
        let args = coerce(&slots, &request(&[])).unwrap();
        assert!(matches!(&args[0], Arg::Context(req) if req.path() == "/"));
    }

    #[test]
    fn body_decodes_into_record() {
        let slots = slots(&[ParamType::record::<Data>()]);
        let req = Request::new(Method::Post, "/").with_body(r#"{"name":"bob"}"#);
        let mut args = coerce(&slots, &req).unwrap();
        let Arg::Body(body) = args.remove(0) else { panic!("expected a body") };
        assert_eq!(*body.downcast::<Data>().unwrap(), Data { name: "bob".into() });
    }

    #[test]
    fn undecodable_body_is_bad_request() {
        let slots = slots(&[ParamType::record::<Data>()]);
        for body in ["", "{", r#"{"other":1}"#] {
            let req = Request::new(Method::Post, "/").with_body(body);
            let err = coerce(&slots, &req).unwrap_err();
            assert!(matches!(err, ApplicationError::BadRequest(_)), "body {body:?}");
        }
    }
}
