//! Filter predicate types: key paths, operators and the parsed `Where`.
//!
//! A [`Where`] is only ever built by the where-clause parser; it is the typed
//! form of a filter string such as `age > 30`.

use std::fmt;

use crate::value::Value;

/// Dot-delimited field reference (`a.b.c`).
///
/// The path is kept as written; segments are not validated, so `a..b`, `.a`
/// and `a.` are all accepted and yield empty segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyPath(String);

impl KeyPath {
    /// Wrap a dotted field path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// The dotted path exactly as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The dot-separated segments, in order.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Comparison operators supported in filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equal (`==`).
    Eq,
    /// Not equal (`!=`).
    Neq,
    /// Greater than (`>`).
    Gt,
    /// Less than (`<`).
    Lt,
    /// Greater than or equal (`>=`).
    Gte,
    /// Less than or equal (`<=`).
    Lte,
    /// Field equals any element of the value (`in`).
    In,
    /// Array field shares an element with the value (`array-contains-any`).
    ArrayContainsAny,
}

impl Operator {
    /// Every operator, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Eq,
        Self::Neq,
        Self::Gt,
        Self::Lt,
        Self::Gte,
        Self::Lte,
        Self::In,
        Self::ArrayContainsAny,
    ];

    /// The source spelling of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "==",
            Self::Neq => "!=",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::In => "in",
            Self::ArrayContainsAny => "array-contains-any",
        }
    }

    /// Look up an operator by its exact source spelling.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.as_str() == token)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed filter predicate: `<key> <operator> <value>`.
#[derive(Debug, Clone, PartialEq)]
pub struct Where {
    key: KeyPath,
    operator: Operator,
    value: Value,
}

impl Where {
    /// Assemble a predicate from its parsed parts.
    #[must_use]
    pub fn new(key: KeyPath, operator: Operator, value: Value) -> Self {
        Self {
            key,
            operator,
            value,
        }
    }

    /// The field the predicate tests.
    #[must_use]
    pub fn key(&self) -> &KeyPath {
        &self.key
    }

    /// The comparison operator.
    #[must_use]
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The right-hand value.
    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl fmt::Display for Where {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.key, self.operator, self.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_split_key_path_segments() {
        let key = KeyPath::new("a.b.c");
        assert_eq!(key.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(KeyPath::new("age").segments().count(), 1);
    }

    #[test]
    fn test_should_keep_empty_segments() {
        assert_eq!(
            KeyPath::new("a..b").segments().collect::<Vec<_>>(),
            vec!["a", "", "b"]
        );
        assert_eq!(KeyPath::new(".a").segments().collect::<Vec<_>>(), vec!["", "a"]);
    }

    #[test]
    fn test_should_round_trip_operator_spelling() {
        for op in Operator::ALL {
            assert_eq!(Operator::from_token(op.as_str()), Some(op));
            assert_eq!(op.to_string(), op.as_str());
        }
    }

    #[test]
    fn test_should_reject_unknown_operator_spelling() {
        assert_eq!(Operator::from_token("="), None);
        assert_eq!(Operator::from_token("IN"), None);
        assert_eq!(Operator::from_token("array-contains"), None);
        assert_eq!(Operator::from_token(""), None);
    }

    #[test]
    fn test_should_render_where() {
        let w = Where::new(
            KeyPath::new("tags"),
            Operator::In,
            Value::Array(vec![Value::String("a".to_owned()), Value::Int(1)]),
        );
        assert_eq!(w.to_string(), r#"tags in ["a", 1]"#);
        assert_eq!(w.key().as_str(), "tags");
        assert_eq!(w.operator(), Operator::In);
    }
}
