//! Dynamic Values
//!
//! Every node in a ruleset carries a [`Value`]. Cells hold whatever the caller
//! assigns; expressions hold whatever their combinator produces, so a single
//! graph can mix booleans, counters and labels.
//!
//! # Equality
//!
//! Change detection is driven by `PartialEq`. Values of the same variant
//! compare directly. Integers and floats compare numerically, so assigning
//! `2.0` to a cell holding `2` is not a change. Booleans never equal numbers,
//! and `NaN` is unequal to itself.
//!
//! # Serialization
//!
//! Values serialize untagged, which lets a plain JSON object such as
//! `{"x": 1, "flag": true}` describe a set of cell assignments.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesetError};

/// A comparable value held by a cell or computed by an expression.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absence of a value. Also the result of an arithmetic expression
    /// over incompatible inputs.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Value {
    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "text",
        }
    }

    /// Boolean interpretation used by the logical combinators.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Int(i) => *i != 0,
            Value::Float(f) => *f != 0.0 && !f.is_nan(),
            Value::Text(s) => !s.is_empty(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Whether two values hold the same content.
    ///
    /// Same as `==` except that two NaN floats match. Change detection keeps
    /// using `==`; this is for checking a cached result against a fresh one.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Float(a), Value::Float(b)) if a.is_nan() && b.is_nan() => true,
            _ => self == other,
        }
    }

    /// Numeric view of the value. Booleans count as 0 and 1.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Bool(b) => Some(f64::from(u8::from(*b))),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Null | Value::Text(_) => None,
        }
    }

    fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Bool(b) => Some(i64::from(*b)),
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Add two values.
    ///
    /// Integer addition that overflows widens to a float. Text operands
    /// concatenate. Any other pairing is a [`RulesetError::TypeMismatch`].
    pub fn checked_add(&self, other: &Value) -> Result<Value> {
        if let (Value::Text(a), Value::Text(b)) = (self, other) {
            return Ok(Value::Text(format!("{a}{b}")));
        }
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return Ok(match a.checked_add(b) {
                Some(sum) => Value::Int(sum),
                None => Value::Float(a as f64 + b as f64),
            });
        }
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Float(a + b)),
            _ => Err(self.mismatch("add", other)),
        }
    }

    /// Multiply two numeric values, widening to a float on overflow.
    pub fn checked_mul(&self, other: &Value) -> Result<Value> {
        if let (Some(a), Some(b)) = (self.as_integer(), other.as_integer()) {
            return Ok(match a.checked_mul(b) {
                Some(product) => Value::Int(product),
                None => Value::Float(a as f64 * b as f64),
            });
        }
        match (self.as_number(), other.as_number()) {
            (Some(a), Some(b)) => Ok(Value::Float(a * b)),
            _ => Err(self.mismatch("multiply", other)),
        }
    }

    fn mismatch(&self, op: &'static str, other: &Value) -> RulesetError {
        RulesetError::TypeMismatch {
            op,
            left: self.type_name(),
            right: other.type_name(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
                (*a as f64) == *b
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
