//! Integration tests for fq against the Firestore emulator.
//!
//! These tests require a Firestore emulator at `FIRESTORE_EMULATOR_HOST`
//! (default `localhost:8080`) and use the `demo-fq` project.
//! They are marked `#[ignore]` so they don't run during normal `cargo test`.
//!
//! Run them with:
//! ```text
//! firebase emulators:start --only firestore --project demo-fq &
//! cargo test -p fq-integration -- --ignored
//! ```

use std::sync::Once;

use fq_core::{Document, DocumentStore, FirestoreConfig, Query, SetMode};
use fq_http::HttpDatastore;
use fq_model::{CollectionPath, FirestorePath, JsonMap};
use serde_json::Value as JsonValue;

static INIT: Once = Once::new();

/// Emulator project used by every test.
pub const TEST_PROJECT: &str = "demo-fq";

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Configuration pointing at the local emulator.
#[must_use]
pub fn emulator_config() -> FirestoreConfig {
    FirestoreConfig::from_env(Some(TEST_PROJECT.to_owned()))
        .unwrap_or_else(|e| panic!("failed to build emulator config: {e}"))
}

/// Create a datastore talking to the local emulator.
#[must_use]
pub fn emulator_store() -> HttpDatastore {
    init_tracing();
    HttpDatastore::from_config(&emulator_config())
        .unwrap_or_else(|e| panic!("failed to create datastore: {e}"))
}

/// Generate a unique collection for a test.
#[must_use]
pub fn test_collection(prefix: &str) -> CollectionPath {
    let id = uuid::Uuid::new_v4().to_string()[..8].to_owned();
    match FirestorePath::parse(&format!("test-{prefix}-{id}")) {
        Ok(FirestorePath::Collection(path)) => path,
        other => panic!("expected collection path, got {other:?}"),
    }
}

/// Unwrap a `json!` object literal.
#[must_use]
pub fn fields(value: JsonValue) -> JsonMap {
    match value {
        JsonValue::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

/// Write `(id, fields)` pairs into `collection`, replacing existing data.
pub async fn seed(store: &HttpDatastore, collection: &CollectionPath, docs: &[(&str, JsonValue)]) {
    for (id, value) in docs {
        let path = collection.doc(id);
        store
            .set_document(&path, &fields(value.clone()), SetMode::Replace)
            .await
            .unwrap_or_else(|e| panic!("failed to seed {path}: {e}"));
    }
}

/// Delete every document in `collection`.
pub async fn cleanup_collection(store: &HttpDatastore, collection: &CollectionPath) {
    let Ok(docs) = store.run_query(&Query::new(collection.clone())).await else {
        return;
    };
    for doc in docs {
        let _ = store.delete_document(&doc.path).await;
    }
}

/// Sorted ids of `docs`.
#[must_use]
pub fn ids(docs: &[Document]) -> Vec<String> {
    let mut ids: Vec<String> = docs.iter().map(|d| d.path.id().to_owned()).collect();
    ids.sort();
    ids
}

mod test_document;
mod test_query;
mod test_triggers;
