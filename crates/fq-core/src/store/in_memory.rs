//! In-memory document store.

use async_trait::async_trait;
use dashmap::DashMap;
use fq_model::{Direction, DocumentPath, JsonMap, KeyPath};
use serde_json::Value as JsonValue;
use tracing::debug;

use super::evaluator::{lookup, matches_filter, sort_cmp};
use super::{Document, DocumentStore, SetMode, StoreError};
use crate::query::Query;

/// Thread-safe document store backed by a [`DashMap`].
///
/// Query results are returned in document-path order unless the query
/// orders by a field, in which case documents without that field are
/// dropped.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    documents: DashMap<DocumentPath, JsonMap>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents across all collections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the store holds no documents.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn evaluate(&self, query: &Query) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .filter(|entry| query.collection.contains(entry.key()))
            .filter(|entry| query.filters.iter().all(|f| matches_filter(entry.value(), f)))
            .map(|entry| Document {
                path: entry.key().clone(),
                fields: entry.value().clone(),
            })
            .collect();
        docs.sort_by(|a, b| a.path.cmp(&b.path));

        if let Some(order) = &query.order_by {
            let key = KeyPath::new(order.field.as_str());
            docs.retain(|d| lookup(&d.fields, &key).is_some());
            docs.sort_by(|a, b| {
                let (Some(x), Some(y)) = (lookup(&a.fields, &key), lookup(&b.fields, &key)) else {
                    return std::cmp::Ordering::Equal;
                };
                match order.direction {
                    Direction::Ascending => sort_cmp(x, y),
                    Direction::Descending => sort_cmp(y, x),
                }
            });
        }

        if let Some(limit) = query.limit {
            docs.truncate(limit as usize);
        }
        docs
    }
}

/// Recursively merge `patch` into `target`: nested objects merge, every
/// other value (including arrays) overwrites.
fn merge_fields(target: &mut JsonMap, patch: &JsonMap) {
    for (key, value) in patch {
        if let (Some(JsonValue::Object(existing)), JsonValue::Object(incoming)) =
            (target.get_mut(key), value)
        {
            if !incoming.is_empty() {
                merge_fields(existing, incoming);
                continue;
            }
        }
        target.insert(key.clone(), value.clone());
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn run_query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        debug!(collection = %query.collection, filters = query.filters.len(), "in-memory query");
        Ok(self.evaluate(query))
    }

    async fn count(&self, query: &Query) -> Result<u64, StoreError> {
        Ok(self.evaluate(query).len() as u64)
    }

    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        Ok(self.documents.get(path).map(|entry| Document {
            path: path.clone(),
            fields: entry.value().clone(),
        }))
    }

    async fn set_document(
        &self,
        path: &DocumentPath,
        fields: &JsonMap,
        mode: SetMode,
    ) -> Result<(), StoreError> {
        debug!(%path, ?mode, "in-memory set");
        match mode {
            SetMode::Replace => {
                self.documents.insert(path.clone(), fields.clone());
            }
            SetMode::Merge => {
                let mut entry = self.documents.entry(path.clone()).or_default();
                merge_fields(entry.value_mut(), fields);
            }
        }
        Ok(())
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StoreError> {
        debug!(%path, "in-memory delete");
        self.documents.remove(path);
        Ok(())
    }
}
