//! `fq delete`.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result};
use fq_core::{DocumentStore, Query};
use fq_model::FirestorePath;
use tracing::{debug, info, warn};

use super::wait_between_writes;
use crate::{cli::DeleteArgs, progress::Progress};

/// Delete the document at `args.path`, or every document of the collection
/// matching `args.filters`.
pub async fn run<W: Write>(store: &dyn DocumentStore, args: &DeleteArgs, out: &mut W) -> Result<()> {
    let targets = match &args.path {
        FirestorePath::Document(path) => {
            if !args.filters.is_empty() {
                warn!(%path, "filters are ignored when deleting a single document");
            }
            vec![path.clone()]
        }
        FirestorePath::Collection(collection) => {
            let query = Query::new(collection.clone()).with_filters(args.filters.iter().cloned());
            let documents = store
                .run_query(&query)
                .await
                .context("firestore query failed")?;
            if documents.is_empty() {
                writeln!(out, "no documents to delete")?;
                return Ok(());
            }
            documents.into_iter().map(|doc| doc.path).collect()
        }
    };

    let delay = Duration::from_millis(args.write.delay);
    let progress = Progress::new(targets.len(), args.write.progress);

    for (i, path) in targets.iter().enumerate() {
        if i > 0 {
            wait_between_writes(delay).await;
        }
        store
            .delete_document(path)
            .await
            .with_context(|| format!("failed to delete document {path}"))?;
        debug!(%path, "document deleted");
        progress.update(out, i + 1)?;
    }
    progress.finish(out)?;
    info!(count = targets.len(), "documents deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use fq_core::{InMemoryStore, SetMode, parse_where};
    use fq_model::DocumentPath;
    use serde_json::{Value as JsonValue, json};

    use super::*;
    use crate::cli::WriteOptions;

    fn doc_path(path: &str) -> DocumentPath {
        match FirestorePath::parse(path).unwrap() {
            FirestorePath::Document(path) => path,
            other => panic!("expected document path, got {other:?}"),
        }
    }

    async fn seeded() -> InMemoryStore {
        let store = InMemoryStore::new();
        for (id, active) in [("a", true), ("b", false), ("c", true)] {
            let JsonValue::Object(fields) = json!({"active": active}) else {
                unreachable!()
            };
            store
                .set_document(&doc_path(&format!("users/{id}")), &fields, SetMode::Replace)
                .await
                .unwrap();
        }
        store
    }

    fn args(path: &str, filters: &[&str], progress: bool) -> DeleteArgs {
        DeleteArgs {
            path: FirestorePath::parse(path).unwrap(),
            filters: filters.iter().map(|f| parse_where(f).unwrap()).collect(),
            write: WriteOptions {
                progress,
                delay: 0,
                disable_triggers: false,
            },
        }
    }

    #[tokio::test]
    async fn test_should_delete_matching_documents() {
        let store = seeded().await;
        let mut out = Vec::new();
        run(&store, &args("users", &["active == true"], true), &mut out)
            .await
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_document(&doc_path("users/b")).await.unwrap().is_some());
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "\x1b[2K\r1/2\x1b[2K\r2/2\n"
        );
    }

    #[tokio::test]
    async fn test_should_report_nothing_to_delete() {
        let store = seeded().await;
        let mut out = Vec::new();
        run(&store, &args("users", &["active == 'maybe'"], false), &mut out)
            .await
            .unwrap();
        assert_eq!(out, b"no documents to delete\n");
        assert_eq!(store.len(), 3);
    }

    #[tokio::test]
    async fn test_should_delete_single_document() {
        let store = seeded().await;
        let mut out = Vec::new();
        run(&store, &args("users/a", &[], true), &mut out)
            .await
            .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(String::from_utf8(out).unwrap(), "\x1b[2K\r1/1\n");
    }

    #[tokio::test]
    async fn test_should_leave_other_collections_alone() {
        let store = seeded().await;
        let JsonValue::Object(fields) = json!({"active": true}) else {
            unreachable!()
        };
        store
            .set_document(&doc_path("teams/t1"), &fields, SetMode::Replace)
            .await
            .unwrap();
        let mut out = Vec::new();
        run(&store, &args("users", &[], false), &mut out).await.unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.get_document(&doc_path("teams/t1")).await.unwrap().is_some());
    }
}
