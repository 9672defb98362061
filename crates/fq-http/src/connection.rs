//! HTTP transport to the Firestore REST API.

use std::time::Duration;

use fq_core::{FirestoreConfig, StoreError};
use reqwest::{Client, Method, RequestBuilder, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::debug;

const FIRESTORE_API_HOST: &str = "https://firestore.googleapis.com";
const FIRESTORE_API_VERSION: &str = "v1";

/// The emulator accepts this token as an admin credential.
const EMULATOR_OWNER_TOKEN: &str = "owner";

/// A configured connection to one Firestore database.
#[derive(Debug, Clone)]
pub struct Connection {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
    request_timeout: Option<Duration>,
}

/// Builder for [`Connection`].
#[derive(Debug, Clone)]
pub struct ConnectionBuilder {
    project_id: String,
    database_id: String,
    client: Option<Client>,
    emulator_host: Option<String>,
    auth_token: Option<String>,
    request_timeout: Option<Duration>,
}

impl ConnectionBuilder {
    /// Start a builder for `projects/{project_id}/databases/{database_id}`.
    #[must_use]
    pub fn new(project_id: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: database_id.into(),
            client: None,
            emulator_host: None,
            auth_token: None,
            request_timeout: None,
        }
    }

    /// Reuse an existing HTTP client.
    #[must_use]
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Talk to the emulator at `host:port` instead of production.
    #[must_use]
    pub fn with_emulator_host(mut self, host: impl Into<String>) -> Self {
        self.emulator_host = Some(host.into());
        self
    }

    /// Bearer token for production requests.
    #[must_use]
    pub fn with_auth_token(mut self, token: Option<String>) -> Self {
        self.auth_token = token;
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    /// Build the connection.
    pub fn build(self) -> Result<Connection, StoreError> {
        let client = match self.client {
            Some(client) => client,
            None => Client::builder()
                .build()
                .map_err(|e| StoreError::Transport(e.to_string()))?,
        };
        let base_url = build_base_url(
            &self.project_id,
            &self.database_id,
            self.emulator_host.as_deref(),
        );
        let base_url = Url::parse(&base_url)
            .map_err(|e| StoreError::Transport(format!("invalid base url {base_url}: {e}")))?;
        let auth_token = if self.emulator_host.is_some() {
            Some(EMULATOR_OWNER_TOKEN.to_owned())
        } else {
            self.auth_token
        };
        Ok(Connection {
            client,
            base_url,
            auth_token,
            request_timeout: self.request_timeout,
        })
    }
}

impl Connection {
    /// Start a builder.
    #[must_use]
    pub fn builder(project_id: impl Into<String>, database_id: impl Into<String>) -> ConnectionBuilder {
        ConnectionBuilder::new(project_id, database_id)
    }

    /// Build a connection from resolved configuration.
    pub fn from_config(config: &FirestoreConfig) -> Result<Self, StoreError> {
        let mut builder = Self::builder(&config.project_id, &config.database_id)
            .with_auth_token(config.access_token.clone())
            .with_request_timeout(config.timeout);
        if let Some(host) = &config.emulator_host {
            builder = builder.with_emulator_host(host);
        }
        builder.build()
    }

    /// Base URL ending in `/databases/{database_id}`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Send a request to the resource below the base URL named by `segments`
    /// and decode the JSON response. Each segment is percent-encoded
    /// separately. Any non-2xx status is an error.
    pub async fn invoke_json<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
        body: Option<&JsonValue>,
    ) -> Result<JsonValue, StoreError> {
        let path = join_segments(segments);
        match self.invoke(method, segments, &path, body).await? {
            (status, text) if status.is_success() => decode_body(&text),
            (status, text) => Err(map_http_error(status, &path, &text)),
        }
    }

    /// Like [`Connection::invoke_json`], but a 404 yields `Ok(None)`.
    pub async fn invoke_json_optional<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
        body: Option<&JsonValue>,
    ) -> Result<Option<JsonValue>, StoreError> {
        let path = join_segments(segments);
        match self.invoke(method, segments, &path, body).await? {
            (status, text) if status.is_success() => decode_body(&text).map(Some),
            (StatusCode::NOT_FOUND, _) => Ok(None),
            (status, text) => Err(map_http_error(status, &path, &text)),
        }
    }

    async fn invoke<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
        path: &str,
        body: Option<&JsonValue>,
    ) -> Result<(StatusCode, String), StoreError> {
        let mut request = self.build_request(method.clone(), segments)?;
        if let Some(body) = body {
            request = request.json(body);
        }
        debug!(%method, path, "firestore request");

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        debug!(%method, path, status = status.as_u16(), "firestore response");
        Ok((status, text))
    }

    fn build_request<S: AsRef<str>>(
        &self,
        method: Method,
        segments: &[S],
    ) -> Result<RequestBuilder, StoreError> {
        let url = self.request_url(segments)?;
        let mut builder = self.client.request(method, url);
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(token) = self.auth_token.as_deref() {
            builder = builder.bearer_auth(token);
        }
        Ok(builder)
    }

    fn request_url<S: AsRef<str>>(&self, segments: &[S]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| {
                StoreError::Transport(format!("base url {} cannot take a path", self.base_url))
            })?
            .extend(segments);
        Ok(url)
    }
}

fn join_segments<S: AsRef<str>>(segments: &[S]) -> String {
    segments
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join("/")
}

fn build_base_url(project_id: &str, database_id: &str, emulator_host: Option<&str>) -> String {
    match emulator_host {
        Some(host) => format!(
            "http://{host}/{FIRESTORE_API_VERSION}/projects/{project_id}/databases/{database_id}"
        ),
        None => format!(
            "{FIRESTORE_API_HOST}/{FIRESTORE_API_VERSION}/projects/{project_id}/databases/{database_id}"
        ),
    }
}

fn decode_body(text: &str) -> Result<JsonValue, StoreError> {
    if text.is_empty() {
        return Ok(JsonValue::Null);
    }
    serde_json::from_str(text).map_err(|e| StoreError::Decode(e.to_string()))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    error: Option<GoogleError>,
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    #[serde(default)]
    message: Option<String>,
}

/// Map an error response to a [`StoreError`], preferring the message from a
/// Google API error body.
fn map_http_error(status: StatusCode, path: &str, body: &str) -> StoreError {
    if status == StatusCode::NOT_FOUND {
        return StoreError::NotFound {
            path: path.to_owned(),
        };
    }
    let message = serde_json::from_str::<GoogleErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .and_then(|e| e.message)
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("HTTP error").to_owned());
    StoreError::Status {
        status: status.as_u16(),
        message,
    }
}
