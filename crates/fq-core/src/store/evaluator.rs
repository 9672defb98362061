//! Local filter evaluation over plain JSON documents.
//!
//! Mirrors Firestore's comparison rules closely enough for tests and local
//! use: numbers compare across integer and float, values of different types
//! never satisfy a range filter, and a missing field never matches.

use std::cmp::Ordering;

use fq_model::{JsonMap, KeyPath, Operator, Value, Where};
use serde_json::Value as JsonValue;

/// Resolve a dotted key path inside a document.
#[must_use]
pub(crate) fn lookup<'a>(fields: &'a JsonMap, key: &KeyPath) -> Option<&'a JsonValue> {
    let mut segments = key.segments();
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Whether a document satisfies a filter.
#[must_use]
pub fn matches_filter(fields: &JsonMap, filter: &Where) -> bool {
    let Some(field) = lookup(fields, filter.key()) else {
        return false;
    };
    let expected = filter.value().to_json();

    match filter.operator() {
        Operator::Eq => json_eq(field, &expected),
        Operator::Neq => !field.is_null() && !json_eq(field, &expected),
        Operator::Gt => compare_json(field, &expected) == Some(Ordering::Greater),
        Operator::Lt => compare_json(field, &expected) == Some(Ordering::Less),
        Operator::Gte => matches!(
            compare_json(field, &expected),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Operator::Lte => matches!(
            compare_json(field, &expected),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Operator::In => filter
            .value()
            .as_array()
            .is_some_and(|candidates| candidates.iter().any(|c| json_eq(field, &c.to_json()))),
        Operator::ArrayContainsAny => match (field.as_array(), filter.value().as_array()) {
            (Some(items), Some(candidates)) => candidates
                .iter()
                .map(Value::to_json)
                .any(|c| items.iter().any(|item| json_eq(item, &c))),
            _ => false,
        },
    }
}

/// Compare two values of the same type class.
///
/// Returns `None` when the values are of different types (other than
/// integer vs. float) or contain incomparable numbers.
#[must_use]
pub fn compare_json(a: &JsonValue, b: &JsonValue) -> Option<Ordering> {
    match (a, b) {
        (JsonValue::Null, JsonValue::Null) => Some(Ordering::Equal),
        (JsonValue::Bool(x), JsonValue::Bool(y)) => Some(x.cmp(y)),
        (JsonValue::Number(x), JsonValue::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => Some(x.cmp(&y)),
            _ => x.as_f64()?.partial_cmp(&y.as_f64()?),
        },
        (JsonValue::String(x), JsonValue::String(y)) => Some(x.cmp(y)),
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            for (l, r) in x.iter().zip(y) {
                match compare_json(l, r)? {
                    Ordering::Equal => {}
                    other => return Some(other),
                }
            }
            Some(x.len().cmp(&y.len()))
        }
        _ => None,
    }
}

/// Total order used for `order by`: first by type rank, then by value.
pub(crate) fn sort_cmp(a: &JsonValue, b: &JsonValue) -> Ordering {
    type_rank(a)
        .cmp(&type_rank(b))
        .then_with(|| compare_json(a, b).unwrap_or(Ordering::Equal))
}

fn type_rank(value: &JsonValue) -> u8 {
    match value {
        JsonValue::Null => 0,
        JsonValue::Bool(_) => 1,
        JsonValue::Number(_) => 2,
        JsonValue::String(_) => 3,
        JsonValue::Array(_) => 4,
        JsonValue::Object(_) => 5,
    }
}

fn json_eq(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Number(_), JsonValue::Number(_)) => {
            compare_json(a, b) == Some(Ordering::Equal)
        }
        (JsonValue::Array(x), JsonValue::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(l, r)| json_eq(l, r))
        }
        (JsonValue::Object(x), JsonValue::Object(y)) => {
            x.len() == y.len()
                && x.iter()
                    .all(|(k, v)| y.get(k).is_some_and(|other| json_eq(v, other)))
        }
        _ => a == b,
    }
}
