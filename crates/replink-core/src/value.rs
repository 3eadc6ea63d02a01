//! Values crossing the bridge.
//!
//! Remote results arrive as [`Value`]: either a primitive copied by value or an
//! [`Proxy`] holding a handle. Arguments travel the other way as [`Arg`],
//! which may also carry composite JSON literals.

use crate::proxy::Proxy;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Positive integer naming one entry of the remote link table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Handle(u64);

impl Handle {
    /// Wrap a raw id. Zero is never issued by the link table.
    pub fn new(id: u64) -> Option<Self> {
        (id > 0).then_some(Handle(id))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value returned by the remote runtime.
#[derive(Debug, Clone)]
pub enum Value {
    /// Remote `null` or `undefined`.
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    /// Anything composite, reachable only through its handle.
    Object(Proxy),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Value::Number(n) => n.as_u64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Proxy> {
        match self {
            Value::Object(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_object(self) -> Option<Proxy> {
        match self {
            Value::Object(p) => Some(p),
            _ => None,
        }
    }

    /// Short description of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Object(_) => "object",
        }
    }
}

/// A host-side argument for a remote call or assignment.
#[derive(Debug, Clone)]
pub enum Arg {
    /// Encoded as a literal. Composite JSON is allowed in this direction.
    Literal(serde_json::Value),
    /// Passed by reference as a link-table lookup.
    Object(Proxy),
}

impl Arg {
    pub fn null() -> Self {
        Arg::Literal(serde_json::Value::Null)
    }
}

impl From<serde_json::Value> for Arg {
    fn from(v: serde_json::Value) -> Self {
        Arg::Literal(v)
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Literal(serde_json::Value::String(s.to_string()))
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Literal(serde_json::Value::String(s))
    }
}

impl From<bool> for Arg {
    fn from(b: bool) -> Self {
        Arg::Literal(serde_json::Value::Bool(b))
    }
}

impl From<i32> for Arg {
    fn from(n: i32) -> Self {
        Arg::Literal(n.into())
    }
}

impl From<i64> for Arg {
    fn from(n: i64) -> Self {
        Arg::Literal(n.into())
    }
}

impl From<u32> for Arg {
    fn from(n: u32) -> Self {
        Arg::Literal(n.into())
    }
}

impl From<u64> for Arg {
    fn from(n: u64) -> Self {
        Arg::Literal(n.into())
    }
}

impl From<usize> for Arg {
    fn from(n: usize) -> Self {
        Arg::Literal(n.into())
    }
}

impl From<f64> for Arg {
    // Non-finite floats have no JSON form and go over as null.
    fn from(n: f64) -> Self {
        Arg::Literal(n.into())
    }
}

impl From<Proxy> for Arg {
    fn from(p: Proxy) -> Self {
        Arg::Object(p)
    }
}

impl From<&Proxy> for Arg {
    fn from(p: &Proxy) -> Self {
        Arg::Object(p.clone())
    }
}

impl From<Value> for Arg {
    fn from(v: Value) -> Self {
        match v {
            Value::Null => Arg::null(),
            Value::Bool(b) => b.into(),
            Value::Number(n) => Arg::Literal(serde_json::Value::Number(n)),
            Value::String(s) => s.into(),
            Value::Object(p) => Arg::Object(p),
        }
    }
}
