//! Firebase emulator hub client.
//!
//! The hub exposes a small admin API; `fq` uses it to pause Cloud Functions
//! background triggers while bulk-writing so seeding data does not fire
//! every `onWrite` handler.

use reqwest::Client;
use tracing::{debug, warn};

use crate::store::StoreError;

/// Client for the emulator hub at `host:port`.
#[derive(Debug, Clone)]
pub struct EmulatorHub {
    client: Client,
    base_url: String,
}

impl EmulatorHub {
    /// Create a client for the hub at `host` (`host:port`).
    #[must_use]
    pub fn new(host: &str) -> Self {
        Self::with_client(Client::new(), host)
    }

    /// Create a client reusing an existing HTTP client.
    #[must_use]
    pub fn with_client(client: Client, host: &str) -> Self {
        Self {
            client,
            base_url: format!("http://{host}"),
        }
    }

    /// Pause background function triggers.
    pub async fn disable_background_triggers(&self) -> Result<(), StoreError> {
        self.put_function("disableBackgroundTriggers").await
    }

    /// Resume background function triggers.
    pub async fn enable_background_triggers(&self) -> Result<(), StoreError> {
        self.put_function("enableBackgroundTriggers").await
    }

    async fn put_function(&self, action: &str) -> Result<(), StoreError> {
        let url = format!("{}/functions/{action}", self.base_url);
        debug!(%url, "emulator hub request");
        let response = self
            .client
            .put(&url)
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let message = response.text().await.unwrap_or_default();
        warn!(%url, status = status.as_u16(), "emulator hub rejected request");
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }
}
