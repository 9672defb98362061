//! Subcommand implementations.
//!
//! Each command talks to a [`fq_core::DocumentStore`] and writes to any
//! `io::Write`, so tests drive them with the in-memory store and a buffer.

pub mod delete;
pub mod query;
pub mod set;

use std::time::Duration;

use anyhow::{Result, bail};
use fq_core::{EmulatorHub, FirestoreConfig, is_emulator_project};
use tracing::{info, warn};

const EMULATOR_PROJECT_DOCS: &str =
    "https://firebase.google.com/docs/emulator-suite/connect_firestore#choose_a_firebase_project";

/// Refuse to write to anything but an emulator project.
pub fn ensure_emulator_project(config: &FirestoreConfig) -> Result<()> {
    if !is_emulator_project(&config.project_id) {
        bail!(
            "only emulator projects are supported (projects starting with demo-*).\nsee {EMULATOR_PROJECT_DOCS}"
        );
    }
    Ok(())
}

/// Pauses emulator background triggers for the duration of a write command.
#[derive(Debug)]
pub struct TriggerGuard {
    hub: Option<EmulatorHub>,
}

impl TriggerGuard {
    /// Disable triggers on the configured hub, if any. Failures are logged.
    pub async fn pause(config: &FirestoreConfig) -> Self {
        let Some(host) = config.emulator_hub.as_deref() else {
            warn!("no emulator hub configured, background triggers stay enabled");
            return Self { hub: None };
        };
        let hub = EmulatorHub::new(host);
        match hub.disable_background_triggers().await {
            Ok(()) => {
                info!(hub = host, "background triggers disabled");
                Self { hub: Some(hub) }
            }
            Err(e) => {
                warn!(error = %e, "failed to disable background triggers");
                Self { hub: None }
            }
        }
    }

    /// Re-enable triggers that [`TriggerGuard::pause`] disabled.
    pub async fn resume(self) {
        let Some(hub) = self.hub else {
            return;
        };
        match hub.enable_background_triggers().await {
            Ok(()) => info!("background triggers enabled"),
            Err(e) => warn!(error = %e, "failed to re-enable background triggers"),
        }
    }
}

/// Sleep between two writes.
async fn wait_between_writes(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(project: &str) -> FirestoreConfig {
        FirestoreConfig::from_vars(Some(project.to_owned()), |_: &str| None).unwrap()
    }

    #[test]
    fn test_should_allow_demo_projects() {
        assert!(ensure_emulator_project(&config("demo-test")).is_ok());
    }

    #[test]
    fn test_should_refuse_production_projects() {
        let err = ensure_emulator_project(&config("my-project")).unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("only emulator projects are supported"));
        assert!(message.ends_with("#choose_a_firebase_project"));
    }

    #[tokio::test]
    async fn test_should_skip_triggers_without_hub() {
        let guard = TriggerGuard::pause(&config("my-project")).await;
        assert!(guard.hub.is_none());
        guard.resume().await;
    }
}
