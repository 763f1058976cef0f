//! Lifecycle verb vocabulary
//!
//! Shared by the gate policy (which verbs need credentials) and the
//! orchestrator (which failure policy applies).

use serde::{Deserialize, Serialize};

/// A user-facing lifecycle intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verb {
    Create,
    Up,
    Stop,
    Restart,
    Destroy,
    Status,
    Ssh,
    List,
    UpdateConfig,
    DeleteConfig,
}

impl Verb {
    /// Verbs that only touch the local configuration store and therefore
    /// must work before any credentials exist.
    pub fn is_config_verb(self) -> bool {
        matches!(self, Verb::UpdateConfig | Verb::DeleteConfig)
    }
}

impl std::fmt::Display for Verb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Verb::Create => "create",
            Verb::Up => "up",
            Verb::Stop => "stop",
            Verb::Restart => "restart",
            Verb::Destroy => "destroy",
            Verb::Status => "status",
            Verb::Ssh => "ssh",
            Verb::List => "list",
            Verb::UpdateConfig => "update-config",
            Verb::DeleteConfig => "delete-config",
        };
        write!(f, "{}", name)
    }
}
