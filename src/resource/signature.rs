//! Route shape from a method's parameter list.
//!
//! Every path-typed parameter becomes one placeholder, named after its type
//! and its 1-based position in the parameter list:
//!
//! ```text
//! fn get(&self, ctx: Request, id: i64, verbose: bool)   →   /:int2/:bool3
//! ```
//!
//! The request context and the body parameter contribute no segment.

use std::any::Any;
use std::fmt;

use serde::de::DeserializeOwned;

use crate::error::SignatureError;

type DecodeFn = fn(&[u8]) -> Result<Box<dyn Any + Send>, serde_json::Error>;

/// A record (struct) type decoded from the JSON request body.
#[derive(Clone, Copy)]
pub struct RecordType {
    name: &'static str,
    decode: DecodeFn,
}

impl RecordType {
    pub fn of<T: DeserializeOwned + Send + 'static>() -> Self {
        Self { name: std::any::type_name::<T>(), decode: decode_into::<T> }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Decodes `body` into a fresh value of the record type, boxed.
    pub(crate) fn decode(&self, body: &[u8]) -> Result<Box<dyn Any + Send>, serde_json::Error> {
        (self.decode)(body)
    }
}

impl fmt::Debug for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RecordType").field(&self.name).finish()
    }
}

fn decode_into<T: DeserializeOwned + Send + 'static>(
    body: &[u8],
) -> Result<Box<dyn Any + Send>, serde_json::Error> {
    serde_json::from_slice::<T>(body).map(|value| Box::new(value) as Box<dyn Any + Send>)
}

/// The declared type of one handler-method parameter.
#[derive(Clone, Copy, Debug)]
pub enum ParamType {
    Str,
    Int,
    Float,
    Bool,
    /// The request context itself.
    Context,
    Record(RecordType),
    /// Anything else; rejected by [`analyze`].
    Unsupported(&'static str),
}

impl ParamType {
    pub fn record<T: DeserializeOwned + Send + 'static>() -> Self {
        Self::Record(RecordType::of::<T>())
    }
}

/// How one argument is produced at request time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SlotKind {
    PathString,
    PathInt,
    PathFloat,
    PathBool,
    RequestContext,
    BodyStruct,
}

impl SlotKind {
    fn type_name(self) -> &'static str {
        match self {
            Self::PathString     => "string",
            Self::PathInt        => "int",
            Self::PathFloat      => "float",
            Self::PathBool       => "bool",
            Self::RequestContext => "context",
            Self::BodyStruct     => "body",
        }
    }

    pub fn is_path(self) -> bool {
        matches!(self, Self::PathString | Self::PathInt | Self::PathFloat | Self::PathBool)
    }
}

/// One positional argument of a handler method.
#[derive(Clone, Debug)]
pub struct ArgumentSlot {
    kind: SlotKind,
    ordinal: usize,
    record: Option<RecordType>,
}

impl ArgumentSlot {
    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    /// 1-based position in the parameter list.
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// `<typeName><ordinal>`, e.g. `int2`. For path slots this is the
    /// placeholder name and the path-parameter key.
    pub fn name(&self) -> String {
        format!("{}{}", self.kind.type_name(), self.ordinal)
    }

    pub(crate) fn record(&self) -> Option<RecordType> {
        self.record
    }
}

/// One segment of a [`RouteTemplate`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Segment {
    Literal(String),
    Placeholder(String),
}

/// An ordered list of path segments; renders as `/a/:string1/:int2`.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RouteTemplate {
    segments: Vec<Segment>,
}

impl RouteTemplate {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Placeholder(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// The template mounted under `prefix`.
    ///
    /// Empty segments are dropped, so `"/"`, `""` and `"/api//v1/"` all
    /// normalise; `:name` segments of the prefix stay placeholders.
    pub fn mounted_at(&self, prefix: &str) -> Self {
        let mut segments: Vec<Segment> = prefix
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Placeholder(name.to_owned()),
                None => Segment::Literal(s.to_owned()),
            })
            .collect();
        segments.extend(self.segments.iter().cloned());
        Self { segments }
    }

    /// The rendered template as a router path; `/` when there are no segments.
    pub fn to_path(&self) -> String {
        match self.to_string() {
            path if path.is_empty() => "/".to_owned(),
            path => path,
        }
    }
}

impl fmt::Display for RouteTemplate {
    /// An empty template renders as `""` so it can be appended to a prefix;
    /// mount it first to get `/`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => write!(f, "/{text}")?,
                Segment::Placeholder(name) => write!(f, "/:{name}")?,
            }
        }
        Ok(())
    }
}

/// Derives the route template and the argument plan of one handler method.
///
/// Slots come back in declaration order. Fails on an unsupported parameter
/// type or on a second record parameter.
pub fn analyze(params: &[ParamType]) -> Result<(RouteTemplate, Vec<ArgumentSlot>), SignatureError> {
    let mut template = RouteTemplate::default();
    let mut slots = Vec::with_capacity(params.len());
    let mut body_at = None;

    for (index, param) in params.iter().enumerate() {
        let ordinal = index + 1;
        let (kind, record) = match *param {
            ParamType::Str     => (SlotKind::PathString, None),
            ParamType::Int     => (SlotKind::PathInt, None),
            ParamType::Float   => (SlotKind::PathFloat, None),
            ParamType::Bool    => (SlotKind::PathBool, None),
            ParamType::Context => (SlotKind::RequestContext, None),
            ParamType::Record(record) => {
                if let Some(first) = body_at {
                    return Err(SignatureError::MultipleBodies { first, second: ordinal });
                }
                body_at = Some(ordinal);
                (SlotKind::BodyStruct, Some(record))
            }
            ParamType::Unsupported(ty) => return Err(SignatureError::Unsupported { ty, ordinal }),
        };

        let slot = ArgumentSlot { kind, ordinal, record };
        if kind.is_path() {
            template.segments.push(Segment::Placeholder(slot.name()));
        }
        slots.push(slot);
    }

    Ok((template, slots))
}
