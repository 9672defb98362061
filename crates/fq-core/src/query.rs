//! Collection query model.

use fq_model::{CollectionPath, Direction, OrderBy, Where};

/// A query over a single collection: filters combined with AND, optional
/// ordering and limit.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// The queried collection.
    pub collection: CollectionPath,
    /// Filters, all of which must match.
    pub filters: Vec<Where>,
    /// Optional ordering.
    pub order_by: Option<OrderBy>,
    /// Optional maximum number of results.
    pub limit: Option<u32>,
}

impl Query {
    /// A query returning every document of `collection`.
    #[must_use]
    pub fn new(collection: CollectionPath) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            order_by: None,
            limit: None,
        }
    }

    /// Append filters.
    #[must_use]
    pub fn with_filters(mut self, filters: impl IntoIterator<Item = Where>) -> Self {
        self.filters.extend(filters);
        self
    }

    /// Order by `field`. An empty field leaves the query unordered.
    #[must_use]
    pub fn with_order_by(mut self, field: &str, direction: Direction) -> Self {
        if !field.is_empty() {
            self.order_by = Some(OrderBy {
                field: field.to_owned(),
                direction,
            });
        }
        self
    }

    /// Limit the result count. `0` means unlimited.
    #[must_use]
    pub fn with_limit(mut self, limit: u32) -> Self {
        if limit > 0 {
            self.limit = Some(limit);
        }
        self
    }
}
