//! JSON <-> Firestore REST value encoding.
//!
//! Firestore's REST API wraps every value in a single-key object naming its
//! type (`{"integerValue": "42"}`, `{"mapValue": {"fields": {...}}}`). Plain
//! JSON maps in and out of that representation here, along with the query
//! and write bodies built from it.

use fq_core::{Query, StoreError};
use fq_model::{CollectionPath, DocumentPath, FirestorePath, JsonMap, Operator, Value, Where};
use serde_json::{Value as JsonValue, json};

/// Encodes requests and decodes responses for one database.
#[derive(Debug, Clone)]
pub struct Serializer {
    database_name: String,
}

impl Serializer {
    /// Create a serializer for `projects/{project_id}/databases/{database_id}`.
    #[must_use]
    pub fn new(project_id: &str, database_id: &str) -> Self {
        Self {
            database_name: format!("projects/{project_id}/databases/{database_id}"),
        }
    }

    /// Full resource name of a document.
    #[must_use]
    pub fn document_name(&self, path: &DocumentPath) -> String {
        format!("{}/documents/{path}", self.database_name)
    }

    /// Parse a full document resource name back into a path.
    pub fn parse_document_name(&self, name: &str) -> Result<DocumentPath, StoreError> {
        let relative = name
            .strip_prefix(&self.database_name)
            .and_then(|rest| rest.strip_prefix("/documents/"))
            .ok_or_else(|| StoreError::Decode(format!("unexpected document name {name:?}")))?;
        match FirestorePath::parse(relative) {
            Ok(FirestorePath::Document(path)) => Ok(path),
            _ => Err(StoreError::Decode(format!(
                "document name {name:?} is not a document path"
            ))),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// Request path segments of a document, relative to the database.
    #[must_use]
    pub fn document_request_path(path: &DocumentPath) -> Vec<String> {
        std::iter::once("documents".to_owned())
            .chain(path.segments().iter().cloned())
            .collect()
    }

    /// Request path segments for calling `rpc` (e.g. `runQuery`) on
    /// `collection`, relative to the database. Subcollection queries are
    /// addressed to the parent document.
    #[must_use]
    pub fn query_request_path(collection: &CollectionPath, rpc: &str) -> Vec<String> {
        let mut segments = match collection.parent() {
            Some(parent) => Self::document_request_path(&parent),
            None => vec!["documents".to_owned()],
        };
        if let Some(last) = segments.last_mut() {
            last.push(':');
            last.push_str(rpc);
        }
        segments
    }

    /// Build a `structuredQuery` object.
    #[must_use]
    pub fn structured_query(query: &Query) -> JsonValue {
        let mut structured = JsonMap::new();
        structured.insert(
            "from".to_owned(),
            json!([{ "collectionId": query.collection.collection_id() }]),
        );

        match query.filters.as_slice() {
            [] => {}
            [single] => {
                structured.insert("where".to_owned(), encode_filter(single));
            }
            many => {
                let filters: Vec<JsonValue> = many.iter().map(encode_filter).collect();
                structured.insert(
                    "where".to_owned(),
                    json!({ "compositeFilter": { "op": "AND", "filters": filters } }),
                );
            }
        }

        if let Some(order) = &query.order_by {
            structured.insert(
                "orderBy".to_owned(),
                json!([{
                    "field": { "fieldPath": encode_field_path(order.field.split('.')) },
                    "direction": order.direction.as_str(),
                }]),
            );
        }

        if let Some(limit) = query.limit {
            structured.insert("limit".to_owned(), json!(limit));
        }

        JsonValue::Object(structured)
    }

    /// Build a `runQuery` request body.
    #[must_use]
    pub fn run_query_body(query: &Query) -> JsonValue {
        json!({ "structuredQuery": Self::structured_query(query) })
    }

    /// Build a `runAggregationQuery` body counting under `alias`.
    #[must_use]
    pub fn count_body(query: &Query, alias: &str) -> JsonValue {
        json!({
            "structuredAggregationQuery": {
                "structuredQuery": Self::structured_query(query),
                "aggregations": [{ "alias": alias, "count": {} }],
            }
        })
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    /// A write that sets the whole document.
    #[must_use]
    pub fn encode_set_write(&self, path: &DocumentPath, fields: &JsonMap) -> JsonValue {
        json!({
            "update": {
                "name": self.document_name(path),
                "fields": encode_fields(fields),
            }
        })
    }

    /// A write that only touches the leaf fields present in `fields`.
    #[must_use]
    pub fn encode_merge_write(&self, path: &DocumentPath, fields: &JsonMap) -> JsonValue {
        let mut write = self.encode_set_write(path, fields);
        if let JsonValue::Object(map) = &mut write {
            map.insert(
                "updateMask".to_owned(),
                json!({ "fieldPaths": leaf_field_paths(fields) }),
            );
        }
        write
    }

    /// A write that deletes the document.
    #[must_use]
    pub fn encode_delete_write(&self, path: &DocumentPath) -> JsonValue {
        json!({ "delete": self.document_name(path) })
    }

    /// Wrap writes in a `commit` body.
    #[must_use]
    pub fn commit_body(writes: Vec<JsonValue>) -> JsonValue {
        json!({ "writes": writes })
    }

    // -----------------------------------------------------------------------
    // Documents
    // -----------------------------------------------------------------------

    /// Decode a REST `Document` into its path and plain fields.
    pub fn decode_document(&self, document: &JsonValue) -> Result<(DocumentPath, JsonMap), StoreError> {
        let name = document
            .get("name")
            .and_then(JsonValue::as_str)
            .ok_or_else(|| StoreError::Decode("document missing 'name' field".to_owned()))?;
        let path = self.parse_document_name(name)?;
        let fields = match document.get("fields") {
            Some(JsonValue::Object(fields)) => decode_fields(fields)?,
            Some(other) => {
                return Err(StoreError::Decode(format!(
                    "document fields must be an object, got {other}"
                )));
            }
            None => JsonMap::new(),
        };
        Ok((path, fields))
    }
}

// ---------------------------------------------------------------------------
// Filters and field paths
// ---------------------------------------------------------------------------

fn operator_name(op: Operator) -> &'static str {
    match op {
        Operator::Eq => "EQUAL",
        Operator::Neq => "NOT_EQUAL",
        Operator::Gt => "GREATER_THAN",
        Operator::Lt => "LESS_THAN",
        Operator::Gte => "GREATER_THAN_OR_EQUAL",
        Operator::Lte => "LESS_THAN_OR_EQUAL",
        Operator::In => "IN",
        Operator::ArrayContainsAny => "ARRAY_CONTAINS_ANY",
    }
}

/// Encode one predicate. Equality against `null` has to be sent as a unary
/// `IS_NULL` / `IS_NOT_NULL` filter.
#[must_use]
pub fn encode_filter(filter: &Where) -> JsonValue {
    let field = json!({ "fieldPath": encode_field_path(filter.key().segments()) });
    match (filter.operator(), filter.value()) {
        (Operator::Eq, Value::Null) => {
            json!({ "unaryFilter": { "op": "IS_NULL", "field": field } })
        }
        (Operator::Neq, Value::Null) => {
            json!({ "unaryFilter": { "op": "IS_NOT_NULL", "field": field } })
        }
        (op, value) => json!({
            "fieldFilter": {
                "field": field,
                "op": operator_name(op),
                "value": encode_value(&value.to_json()),
            }
        }),
    }
}

/// Join segments into a field path, backtick-quoting those that are not
/// simple identifiers.
pub fn encode_field_path<'a>(segments: impl IntoIterator<Item = &'a str>) -> String {
    segments
        .into_iter()
        .map(quote_segment)
        .collect::<Vec<_>>()
        .join(".")
}

fn quote_segment(segment: &str) -> String {
    let mut chars = segment.chars();
    let simple = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        segment.to_owned()
    } else {
        let escaped = segment.replace('\\', "\\\\").replace('`', "\\`");
        format!("`{escaped}`")
    }
}

/// Field paths of every leaf value. Non-empty objects are descended into;
/// everything else (including empty objects and arrays) is a leaf.
#[must_use]
pub fn leaf_field_paths(fields: &JsonMap) -> Vec<String> {
    let mut paths = Vec::new();
    collect_leaves(fields, &mut Vec::new(), &mut paths);
    paths
}

fn collect_leaves<'a>(fields: &'a JsonMap, prefix: &mut Vec<&'a str>, out: &mut Vec<String>) {
    for (key, value) in fields {
        prefix.push(key);
        match value {
            JsonValue::Object(inner) if !inner.is_empty() => collect_leaves(inner, prefix, out),
            _ => out.push(encode_field_path(prefix.iter().copied())),
        }
        prefix.pop();
    }
}

// ---------------------------------------------------------------------------
// Values
// ---------------------------------------------------------------------------

/// Encode plain JSON into a Firestore value.
#[must_use]
pub fn encode_value(value: &JsonValue) -> JsonValue {
    match value {
        JsonValue::Null => json!({ "nullValue": null }),
        JsonValue::Bool(b) => json!({ "booleanValue": b }),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => json!({ "integerValue": i.to_string() }),
            None => json!({ "doubleValue": n.as_f64() }),
        },
        JsonValue::String(s) => json!({ "stringValue": s }),
        JsonValue::Array(items) => {
            let values: Vec<JsonValue> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        JsonValue::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// Encode every field of a map.
#[must_use]
pub fn encode_fields(fields: &JsonMap) -> JsonValue {
    JsonValue::Object(
        fields
            .iter()
            .map(|(k, v)| (k.clone(), encode_value(v)))
            .collect(),
    )
}

/// Decode a map of Firestore values.
pub fn decode_fields(fields: &JsonMap) -> Result<JsonMap, StoreError> {
    fields
        .iter()
        .map(|(k, v)| decode_value(v).map(|decoded| (k.clone(), decoded)))
        .collect()
}

/// Decode a Firestore value into plain JSON.
///
/// Timestamps, bytes and references become strings; geo points become
/// `{"latitude", "longitude"}` objects; non-finite doubles become `null`.
pub fn decode_value(value: &JsonValue) -> Result<JsonValue, StoreError> {
    let invalid = || StoreError::Decode(format!("unsupported firestore value: {value}"));
    let object = value.as_object().ok_or_else(invalid)?;
    let (kind, inner) = object.iter().next().ok_or_else(invalid)?;

    match kind.as_str() {
        "nullValue" => Ok(JsonValue::Null),
        "booleanValue" => inner.as_bool().map(JsonValue::Bool).ok_or_else(invalid),
        "integerValue" => {
            let parsed = match inner {
                JsonValue::String(s) => s.parse::<i64>().ok(),
                JsonValue::Number(n) => n.as_i64(),
                _ => None,
            };
            parsed.map(JsonValue::from).ok_or_else(invalid)
        }
        "doubleValue" => {
            let parsed = match inner {
                JsonValue::Number(n) => n.as_f64(),
                JsonValue::String(s) => s.parse::<f64>().ok(),
                _ => None,
            };
            let v = parsed.ok_or_else(invalid)?;
            Ok(serde_json::Number::from_f64(v).map_or(JsonValue::Null, JsonValue::Number))
        }
        "stringValue" | "timestampValue" | "bytesValue" | "referenceValue" => inner
            .as_str()
            .map(|s| JsonValue::String(s.to_owned()))
            .ok_or_else(invalid),
        "geoPointValue" => Ok(json!({
            "latitude": inner.get("latitude").cloned().unwrap_or(json!(0.0)),
            "longitude": inner.get("longitude").cloned().unwrap_or(json!(0.0)),
        })),
        "arrayValue" => match inner.get("values") {
            Some(JsonValue::Array(items)) => items
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(JsonValue::Array),
            Some(_) => Err(invalid()),
            None => Ok(JsonValue::Array(Vec::new())),
        },
        "mapValue" => match inner.get("fields") {
            Some(JsonValue::Object(fields)) => decode_fields(fields).map(JsonValue::Object),
            Some(_) => Err(invalid()),
            None => Ok(JsonValue::Object(JsonMap::new())),
        },
        _ => Err(invalid()),
    }
}
