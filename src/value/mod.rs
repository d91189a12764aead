//! Typed values stored in an archive.
//!
//! [`TypedValue`] is the unit of storage: a primitive, a [`NumericArray`],
//! or a nested [`Record`]. Equality is structural and is what round-trip
//! guarantees are stated in terms of.

mod array;
mod record;

pub use array::NumericArray;
pub use record::Record;

use std::fmt;

use crate::util::{Error, Result};

/// Discriminator of a [`TypedValue`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    String,
    Array,
    Record,
}

impl ValueKind {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::String => "string",
            Self::Array => "array",
            Self::Record => "record",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A serializable datum.
#[derive(Clone, Debug)]
pub enum TypedValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Array(NumericArray),
    Record(Record),
}

impl TypedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Bool(_) => ValueKind::Bool,
            Self::Int(_) => ValueKind::Int,
            Self::Float(_) => ValueKind::Float,
            Self::String(_) => ValueKind::String,
            Self::Array(_) => ValueKind::Array,
            Self::Record(_) => ValueKind::Record,
        }
    }

    fn mismatch(&self, expected: ValueKind) -> Error {
        Error::mismatch(expected.name(), self.kind().name())
    }

    pub fn as_bool(&self) -> Result<bool> {
        match self {
            Self::Bool(v) => Ok(*v),
            other => Err(other.mismatch(ValueKind::Bool)),
        }
    }

    pub fn as_int(&self) -> Result<i64> {
        match self {
            Self::Int(v) => Ok(*v),
            other => Err(other.mismatch(ValueKind::Int)),
        }
    }

    pub fn as_float(&self) -> Result<f64> {
        match self {
            Self::Float(v) => Ok(*v),
            other => Err(other.mismatch(ValueKind::Float)),
        }
    }

    pub fn as_str(&self) -> Result<&str> {
        match self {
            Self::String(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::String)),
        }
    }

    pub fn as_array(&self) -> Result<&NumericArray> {
        match self {
            Self::Array(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Array)),
        }
    }

    pub fn as_record(&self) -> Result<&Record> {
        match self {
            Self::Record(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Record)),
        }
    }

    pub fn into_array(self) -> Result<NumericArray> {
        match self {
            Self::Array(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Array)),
        }
    }

    pub fn into_record(self) -> Result<Record> {
        match self {
            Self::Record(v) => Ok(v),
            other => Err(other.mismatch(ValueKind::Record)),
        }
    }
}

// Floats compare by bit pattern so that a value always equals its own
// round-trip, NaN payloads and signed zeros included.
impl PartialEq for TypedValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Array(a), Self::Array(b)) => a == b,
            (Self::Record(a), Self::Record(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for TypedValue {}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<NumericArray> for TypedValue {
    fn from(v: NumericArray) -> Self {
        Self::Array(v)
    }
}

impl From<Record> for TypedValue {
    fn from(v: Record) -> Self {
        Self::Record(v)
    }
}
