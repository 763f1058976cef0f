//! Aggregated operation reports

use crate::error::HostAction;
use serde::{Deserialize, Serialize};

/// Outcome of one per-host action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostOutcome {
    pub host: String,
    pub action: HostAction,
    /// Error text when the action failed.
    pub error: Option<String>,
}

/// Result of running one lifecycle verb over a topology.
///
/// Fail-fast verbs carry at most one failed outcome; aggregate verbs carry
/// every failure encountered. `is_success` drives the process exit status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpReport {
    pub succeeded: Vec<HostOutcome>,
    pub failed: Vec<HostOutcome>,
}

impl OpReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, host: impl Into<String>, action: HostAction) {
        self.succeeded.push(HostOutcome {
            host: host.into(),
            action,
            error: None,
        });
    }

    pub fn add_failure(
        &mut self,
        host: impl Into<String>,
        action: HostAction,
        error: impl Into<String>,
    ) {
        self.failed.push(HostOutcome {
            host: host.into(),
            action,
            error: Some(error.into()),
        });
    }

    /// Hosts with at least one successful action, in execution order,
    /// deduplicated.
    pub fn succeeded_hosts(&self) -> Vec<&str> {
        let mut hosts: Vec<&str> = Vec::new();
        for outcome in &self.succeeded {
            if !hosts.contains(&outcome.host.as_str()) {
                hosts.push(&outcome.host);
            }
        }
        hosts
    }
}

impl std::fmt::Display for OpReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} action(s) succeeded, {} failed",
            self.succeeded.len(),
            self.failed.len()
        )?;
        for outcome in &self.failed {
            write!(
                f,
                "\n  {} on '{}': {}",
                outcome.action,
                outcome.host,
                outcome.error.as_deref().unwrap_or("unknown error")
            )?;
        }
        Ok(())
    }
}
