//! Result ordering.

use std::fmt;

/// Sort direction for an order-by clause.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    /// Smallest first.
    #[default]
    Ascending,
    /// Largest first.
    Descending,
}

impl Direction {
    /// The Firestore REST enum name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "ASCENDING",
            Self::Descending => "DESCENDING",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order results by a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Dotted field path.
    pub field: String,
    /// Sort direction.
    pub direction: Direction,
}
