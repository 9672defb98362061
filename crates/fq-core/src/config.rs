//! Firestore connection configuration.

use std::env;
use std::time::Duration;

/// Project id prefix reserved for emulator-only projects.
pub const EMULATOR_PROJECT_PREFIX: &str = "demo-";

/// Default Firestore database id.
pub const DEFAULT_DATABASE: &str = "(default)";

const DEFAULT_EMULATOR_HOST: &str = "localhost:8080";
const DEFAULT_EMULATOR_HUB: &str = "localhost:4400";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// No project id from flags or environment.
    #[error("no project id set (use --project or GCLOUD_PROJECT)")]
    MissingProject,
}

/// Whether `project_id` names an emulator-only project.
#[must_use]
pub fn is_emulator_project(project_id: &str) -> bool {
    project_id.starts_with(EMULATOR_PROJECT_PREFIX)
}

/// Resolved settings for talking to Firestore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// Google Cloud project id.
    pub project_id: String,
    /// Firestore database id.
    pub database_id: String,
    /// Firestore emulator `host:port`; set only for emulator projects.
    pub emulator_host: Option<String>,
    /// Firebase emulator hub `host:port`; set only for emulator projects.
    pub emulator_hub: Option<String>,
    /// Bearer token for production requests.
    pub access_token: Option<String>,
    /// Upper bound for a whole command.
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// Build configuration for `project_id` (or `GCLOUD_PROJECT` /
    /// `GCLOUD_PROJECT_ID` when `None`) from environment variables.
    pub fn from_env(project_id: Option<String>) -> Result<Self, ConfigError> {
        Self::from_vars(project_id, |key| env::var(key).ok())
    }

    /// Like [`FirestoreConfig::from_env`], reading variables through `var`.
    pub fn from_vars(
        project_id: Option<String>,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let non_empty = |key: &str| var(key).filter(|v| !v.is_empty());

        let project_id = project_id
            .filter(|p| !p.is_empty())
            .or_else(|| non_empty("GCLOUD_PROJECT"))
            .or_else(|| non_empty("GCLOUD_PROJECT_ID"))
            .ok_or(ConfigError::MissingProject)?;

        let emulator = is_emulator_project(&project_id);
        let emulator_host = emulator.then(|| {
            non_empty("FIRESTORE_EMULATOR_HOST").unwrap_or_else(|| DEFAULT_EMULATOR_HOST.to_owned())
        });
        let emulator_hub = emulator.then(|| {
            non_empty("FIREBASE_EMULATOR_HUB").unwrap_or_else(|| DEFAULT_EMULATOR_HUB.to_owned())
        });

        Ok(Self {
            project_id,
            database_id: non_empty("FIRESTORE_DATABASE")
                .unwrap_or_else(|| DEFAULT_DATABASE.to_owned()),
            emulator_host,
            emulator_hub,
            access_token: non_empty("FQ_ACCESS_TOKEN"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    /// Override the database id. Empty values are ignored.
    #[must_use]
    pub fn with_database(mut self, database_id: Option<String>) -> Self {
        if let Some(db) = database_id.filter(|d| !d.is_empty()) {
            self.database_id = db;
        }
        self
    }

    /// Override the command timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether requests go to the local emulator.
    #[must_use]
    pub fn is_emulator(&self) -> bool {
        self.emulator_host.is_some()
    }
}
