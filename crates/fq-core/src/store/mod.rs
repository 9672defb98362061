//! Document storage abstraction.
//!
//! [`DocumentStore`] is the seam between the command layer and a concrete
//! backend. The REST client in `fq-http` talks to Firestore (or its
//! emulator); [`InMemoryStore`] evaluates queries locally and backs the
//! command tests.

mod evaluator;
mod in_memory;

use async_trait::async_trait;
use fq_model::{DocumentPath, JsonMap};

use crate::query::Query;

pub use evaluator::{compare_json, matches_filter};
pub use in_memory::InMemoryStore;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced by document store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The addressed document or resource does not exist.
    #[error("not found: {path}")]
    NotFound {
        /// Resource path.
        path: String,
    },
    /// The backend answered with an error status.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided message.
        message: String,
    },
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response could not be decoded.
    #[error("invalid response: {0}")]
    Decode(String),
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A stored document: its path and plain JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Full document path.
    pub path: DocumentPath,
    /// Field values.
    pub fields: JsonMap,
}

/// How a write combines with an existing document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SetMode {
    /// Overwrite only the written leaf fields, keep the rest.
    #[default]
    Merge,
    /// Replace the whole document.
    Replace,
}

/// Asynchronous access to a Firestore-like document database.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Run a collection query.
    async fn run_query(&self, query: &Query) -> Result<Vec<Document>, StoreError>;

    /// Count the documents matching a query. The limit, if any, caps the
    /// count.
    async fn count(&self, query: &Query) -> Result<u64, StoreError>;

    /// Fetch one document. A missing document is `Ok(None)`.
    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError>;

    /// Create or update a document.
    async fn set_document(
        &self,
        path: &DocumentPath,
        fields: &JsonMap,
        mode: SetMode,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StoreError>;
}
