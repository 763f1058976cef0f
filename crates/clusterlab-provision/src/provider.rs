//! Provisioning backend trait

use crate::error::Result;
use async_trait::async_trait;
use clusterlab_core::{HostSpec, Topology};
use serde::{Deserialize, Serialize};

/// Power/provision state of one host, as reported by the backend.
///
/// The backend is the source of truth; nothing in clusterlab caches this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostState {
    NotCreated,
    Running,
    Stopped,
    /// Host unreachable or state unparseable. Status reporting maps backend
    /// failures here instead of failing the whole command.
    Unknown,
}

impl std::fmt::Display for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostState::NotCreated => write!(f, "not created"),
            HostState::Running => write!(f, "running"),
            HostState::Stopped => write!(f, "stopped"),
            HostState::Unknown => write!(f, "unknown"),
        }
    }
}

/// One backend-known machine, from the global inventory query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HostRecord {
    pub name: String,
    pub state: HostState,
    /// Backend-side identifier or location, when the backend reports one
    /// (e.g. the Vagrant state directory for global-status entries).
    pub origin: Option<String>,
}

/// Boundary to the external virtual-machine provisioning backend.
///
/// One provider instance is scoped to one cluster (one backend state
/// directory); only [`global_inventory`](HostProvider::global_inventory)
/// looks beyond it. All operations are blocking from the orchestrator's
/// point of view: one call at a time, awaited to completion.
#[async_trait]
pub trait HostProvider: Send + Sync {
    /// Backend name for logs and error messages.
    fn name(&self) -> &str;

    /// Materialize backend state for the topology before any per-host call
    /// (for Vagrant: write the multi-machine Vagrantfile).
    async fn prepare(&self, topology: &Topology) -> Result<()>;

    /// Create the named host.
    async fn provision(&self, host: &HostSpec) -> Result<()>;

    async fn power_on(&self, host: &str) -> Result<()>;

    async fn power_off(&self, host: &str) -> Result<()>;

    /// Remove the named host from the backend. Terminal.
    async fn deprovision(&self, host: &str) -> Result<()>;

    async fn query_state(&self, host: &str) -> Result<HostState>;

    /// Open an interactive session to the named host, inheriting the
    /// terminal. Returns when the session ends.
    async fn interactive_session(&self, host: &str) -> Result<()>;

    /// Backend-wide machine list, including machines created outside
    /// clusterlab.
    async fn global_inventory(&self) -> Result<Vec<HostRecord>>;
}
