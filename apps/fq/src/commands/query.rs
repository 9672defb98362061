//! `fq query`.

use std::io::Write;

use anyhow::{Context, Result, bail};
use fq_core::{DocumentStore, Query};
use fq_model::{Direction, FirestorePath};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::{cli::QueryArgs, output::write_json};

/// Run a query and print the result as JSON.
pub async fn run<W: Write>(
    store: &dyn DocumentStore,
    args: &QueryArgs,
    out: &mut W,
    pretty: bool,
) -> Result<()> {
    let result = match &args.path {
        FirestorePath::Collection(collection) => {
            let direction = if args.desc {
                Direction::Descending
            } else {
                Direction::Ascending
            };
            let query = Query::new(collection.clone())
                .with_filters(args.filters.iter().cloned())
                .with_order_by(&args.order_by, direction)
                .with_limit(args.limit);
            debug!(?query, "running query");

            if args.count {
                let count = store.count(&query).await.context("firestore query failed")?;
                JsonValue::from(count)
            } else {
                let documents = store
                    .run_query(&query)
                    .await
                    .context("firestore query failed")?;
                JsonValue::Array(
                    documents
                        .into_iter()
                        .map(|doc| JsonValue::Object(doc.fields))
                        .collect(),
                )
            }
        }
        FirestorePath::Document(path) => {
            if !args.filters.is_empty() {
                debug!(%path, "filters are ignored for document paths");
            }
            match store
                .get_document(path)
                .await
                .context("firestore query failed")?
            {
                Some(doc) => JsonValue::Object(doc.fields),
                None => bail!("document does not exist"),
            }
        }
    };
    write_json(out, &result, pretty)
}
