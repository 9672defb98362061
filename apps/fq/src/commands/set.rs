//! `fq set`.

use std::{io::Write, time::Duration};

use anyhow::{Context, Result, bail};
use fq_core::{DocumentStore, SetMode};
use fq_model::{CollectionPath, DocumentPath, FirestorePath, JsonArray, JsonMap, JsonObject};
use serde_json::Value as JsonValue;
use tracing::{debug, info};
use uuid::Uuid;

use super::wait_between_writes;
use crate::{cli::SetArgs, progress::Progress};

/// Length of generated document ids.
const AUTO_ID_LEN: usize = 20;

/// Write `data` to the path in `args`. `source` names the input in errors.
pub async fn run<W: Write>(
    store: &dyn DocumentStore,
    args: &SetArgs,
    data: &[u8],
    source: &str,
    out: &mut W,
) -> Result<()> {
    let writes = match &args.path {
        FirestorePath::Document(path) => {
            let fields = JsonObject::from_slice(data)
                .with_context(|| format!("failed to decode json from {source}"))?
                .into_inner();
            vec![(path.clone(), fields)]
        }
        FirestorePath::Collection(collection) => {
            let objects = JsonArray::from_slice(data)
                .with_context(|| format!("failed to decode json from {source}"))?
                .into_inner();
            if objects.is_empty() {
                writeln!(out, "empty input data")?;
                return Ok(());
            }
            objects
                .into_iter()
                .map(|fields| Ok((document_path(collection, &fields)?, fields)))
                .collect::<Result<Vec<_>>>()?
        }
    };

    let mode = if args.replace {
        SetMode::Replace
    } else {
        SetMode::Merge
    };
    let delay = Duration::from_millis(args.write.delay);
    let progress = Progress::new(writes.len(), args.write.progress);

    for (i, (path, fields)) in writes.iter().enumerate() {
        if i > 0 {
            wait_between_writes(delay).await;
        }
        store
            .set_document(path, fields, mode)
            .await
            .with_context(|| format!("failed to set document {path}"))?;
        debug!(%path, ?mode, "document written");
        progress.update(out, i + 1)?;
    }
    progress.finish(out)?;
    info!(count = writes.len(), "documents written");
    Ok(())
}

/// Target of one array element: its string `id`, or a generated id.
fn document_path(collection: &CollectionPath, fields: &JsonMap) -> Result<DocumentPath> {
    match fields.get("id") {
        None => Ok(collection.doc(&auto_id())),
        Some(JsonValue::String(id)) if id.is_empty() => bail!("id must not be empty"),
        Some(JsonValue::String(id)) if id.contains('/') => {
            bail!("id must not contain '/'. got: {id}")
        }
        Some(JsonValue::String(id)) => Ok(collection.doc(id)),
        Some(other) => bail!("id must be of type string. got: {}", json_type_name(other)),
    }
}

fn auto_id() -> String {
    let mut id = Uuid::new_v4().simple().to_string();
    id.truncate(AUTO_ID_LEN);
    id
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(n) if n.is_f64() => "float",
        JsonValue::Number(_) => "int",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}
