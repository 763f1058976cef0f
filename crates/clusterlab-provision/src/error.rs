//! Provisioning error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One per-host backend operation, used to attach context to failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostAction {
    Provision,
    PowerOn,
    PowerOff,
    Deprovision,
    QueryState,
    Session,
}

impl std::fmt::Display for HostAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostAction::Provision => write!(f, "provision"),
            HostAction::PowerOn => write!(f, "power-on"),
            HostAction::PowerOff => write!(f, "power-off"),
            HostAction::Deprovision => write!(f, "deprovision"),
            HostAction::QueryState => write!(f, "query-state"),
            HostAction::Session => write!(f, "session"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("host '{0}' does not resolve to a known cluster member")]
    HostNotFound(String),

    #[error("{action} failed on host '{host}': {message}")]
    HostAction {
        host: String,
        action: HostAction,
        message: String,
    },

    #[error("provisioning backend error: {0}")]
    Backend(String),
}

impl ProvisionError {
    /// Wrap a backend failure with host identity and action context.
    pub fn host_action(
        host: impl Into<String>,
        action: HostAction,
        message: impl Into<String>,
    ) -> Self {
        ProvisionError::HostAction {
            host: host.into(),
            action,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProvisionError>;
