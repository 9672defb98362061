//! The typed right-hand side of a filter.
//!
//! [`Value`] is a tagged union over the scalar kinds the filter grammar can
//! express, plus a flat [`Value::Array`]. Every value has two renderings:
//!
//! - the *native* representation ([`Value::to_json`]), which is what a store
//!   receives as a query parameter;
//! - the *canonical* textual rendering ([`fmt::Display`]), which is valid
//!   filter syntax again: strings are double-quoted, floats always carry a
//!   decimal point, arrays render as `[v1, v2, ...]`.

use std::fmt;

use serde_json::Value as JsonValue;

/// A parsed filter value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// String literal (single- or double-quoted in the source).
    String(String),
    /// Integer literal.
    Int(i64),
    /// Decimal literal.
    Float(f64),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
    /// Bracketed list of scalars, order preserved.
    Array(Vec<Value>),
}

impl Value {
    /// Returns the native JSON representation handed to a store.
    ///
    /// Non-finite floats have no JSON form and become `null`; the parser
    /// never produces them.
    #[must_use]
    pub fn to_json(&self) -> JsonValue {
        match self {
            Self::String(s) => JsonValue::String(s.clone()),
            Self::Int(i) => JsonValue::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f).map_or(JsonValue::Null, JsonValue::Number),
            Self::Bool(b) => JsonValue::Bool(*b),
            Self::Null => JsonValue::Null,
            Self::Array(values) => JsonValue::Array(values.iter().map(Self::to_json).collect()),
        }
    }

    /// Returns the elements if this is an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Self::Array(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write_float(f, *v),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Floats render in their shortest round-trip form, with `.0` appended to
/// whole numbers so the text lexes back as a float rather than an integer.
fn write_float(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    let text = v.to_string();
    if v.is_finite() && !text.contains('.') {
        write!(f, "{text}.0")
    } else {
        f.write_str(&text)
    }
}
