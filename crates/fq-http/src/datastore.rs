//! [`DocumentStore`] over the Firestore REST API.

use async_trait::async_trait;
use fq_core::{Document, DocumentStore, FirestoreConfig, Query, SetMode, StoreError};
use fq_model::{DocumentPath, JsonMap};
use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::connection::Connection;
use crate::serializer::{Serializer, decode_value};

const COUNT_ALIAS: &str = "count";

/// Firestore REST v1 datastore.
#[derive(Debug, Clone)]
pub struct HttpDatastore {
    connection: Connection,
    serializer: Serializer,
}

impl HttpDatastore {
    /// Connect using resolved configuration.
    pub fn from_config(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let connection = Connection::from_config(config)?;
        Ok(Self::new(
            connection,
            Serializer::new(&config.project_id, &config.database_id),
        ))
    }

    /// Assemble from an existing connection and serializer.
    #[must_use]
    pub fn new(connection: Connection, serializer: Serializer) -> Self {
        Self {
            connection,
            serializer,
        }
    }

    async fn commit(&self, writes: Vec<JsonValue>) -> Result<(), StoreError> {
        let body = Serializer::commit_body(writes);
        self.connection
            .invoke_json(Method::POST, &["documents:commit"], Some(&body))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for HttpDatastore {
    async fn run_query(&self, query: &Query) -> Result<Vec<Document>, StoreError> {
        let request_path = Serializer::query_request_path(&query.collection, "runQuery");
        let body = Serializer::run_query_body(query);
        debug!(collection = %query.collection, filters = query.filters.len(), "running query");

        let response = self
            .connection
            .invoke_json(Method::POST, &request_path, Some(&body))
            .await?;
        let entries = response
            .as_array()
            .ok_or_else(|| StoreError::Decode("runQuery response must be an array".to_owned()))?;

        let mut documents = Vec::new();
        for entry in entries {
            let Some(document) = entry.get("document") else {
                continue;
            };
            let (path, fields) = self.serializer.decode_document(document)?;
            documents.push(Document { path, fields });
        }
        Ok(documents)
    }

    async fn count(&self, query: &Query) -> Result<u64, StoreError> {
        let request_path =
            Serializer::query_request_path(&query.collection, "runAggregationQuery");
        let body = Serializer::count_body(query, COUNT_ALIAS);

        let response = self
            .connection
            .invoke_json(Method::POST, &request_path, Some(&body))
            .await?;
        let entries = response.as_array().ok_or_else(|| {
            StoreError::Decode("runAggregationQuery response must be an array".to_owned())
        })?;

        for entry in entries {
            let Some(value) = entry
                .get("result")
                .and_then(|r| r.get("aggregateFields"))
                .and_then(|f| f.get(COUNT_ALIAS))
            else {
                continue;
            };
            return decode_value(value)?
                .as_u64()
                .ok_or_else(|| StoreError::Decode(format!("count is not an integer: {value}")));
        }
        Err(StoreError::Decode(format!(
            "missing '{COUNT_ALIAS}' key in response"
        )))
    }

    async fn get_document(&self, path: &DocumentPath) -> Result<Option<Document>, StoreError> {
        let request_path = Serializer::document_request_path(path);
        let Some(document) = self
            .connection
            .invoke_json_optional(Method::GET, &request_path, None)
            .await?
        else {
            return Ok(None);
        };
        let (path, fields) = self.serializer.decode_document(&document)?;
        Ok(Some(Document { path, fields }))
    }

    async fn set_document(
        &self,
        path: &DocumentPath,
        fields: &JsonMap,
        mode: SetMode,
    ) -> Result<(), StoreError> {
        debug!(%path, ?mode, "setting document");
        let write = match mode {
            SetMode::Merge => self.serializer.encode_merge_write(path, fields),
            SetMode::Replace => self.serializer.encode_set_write(path, fields),
        };
        self.commit(vec![write]).await
    }

    async fn delete_document(&self, path: &DocumentPath) -> Result<(), StoreError> {
        debug!(%path, "deleting document");
        self.commit(vec![self.serializer.encode_delete_write(path)])
            .await
    }
}
