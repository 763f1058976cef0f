//! Lifecycle orchestrator
//!
//! Maps each lifecycle verb onto a sequence of per-host backend calls.
//! Start-like verbs walk the topology in order (coordinator before
//! segments, standby last) and stop at the first failure: a half-built
//! cluster is not safe to keep extending. Teardown verbs walk in reverse
//! and keep going past failures, aggregating every error, so cleanup is
//! maximally effective even when one host is already gone.
//!
//! Execution is strictly sequential: one backend call at a time, awaited to
//! completion, because segment hosts depend on the coordinator being up and
//! the backend's state directory is not safe for concurrent mutation.

use crate::error::{HostAction, ProvisionError, Result};
use crate::provider::{HostProvider, HostState};
use crate::report::OpReport;
use clusterlab_core::{HostSpec, Topology};

/// State of one host as reported by `status`.
#[derive(Debug, Clone)]
pub struct StatusEntry {
    pub host: HostSpec,
    pub state: HostState,
}

/// Drives one provisioning backend through lifecycle verbs.
pub struct Orchestrator<'a> {
    provider: &'a dyn HostProvider,
}

impl<'a> Orchestrator<'a> {
    pub fn new(provider: &'a dyn HostProvider) -> Self {
        Self { provider }
    }

    /// Provision and power on every host, coordinator first.
    ///
    /// Fail-fast: an already-created prefix of the topology is left in
    /// place (no rollback) and named in the report.
    pub async fn create(&self, topology: &Topology) -> Result<OpReport> {
        self.provider.prepare(topology).await?;

        let mut report = OpReport::new();
        for host in topology.iter() {
            tracing::debug!(host = %host.name, "provisioning");
            if let Err(e) = self.provider.provision(host).await {
                report.add_failure(&host.name, HostAction::Provision, e.to_string());
                return Ok(report);
            }
            report.add_success(&host.name, HostAction::Provision);

            tracing::debug!(host = %host.name, "powering on");
            if let Err(e) = self.provider.power_on(&host.name).await {
                report.add_failure(&host.name, HostAction::PowerOn, e.to_string());
                return Ok(report);
            }
            report.add_success(&host.name, HostAction::PowerOn);
        }
        Ok(report)
    }

    /// Power on every host in topology order. Fail-fast.
    pub async fn up(&self, topology: &Topology) -> Result<OpReport> {
        let mut report = OpReport::new();
        for host in topology.iter() {
            tracing::debug!(host = %host.name, "powering on");
            if let Err(e) = self.provider.power_on(&host.name).await {
                report.add_failure(&host.name, HostAction::PowerOn, e.to_string());
                return Ok(report);
            }
            report.add_success(&host.name, HostAction::PowerOn);
        }
        Ok(report)
    }

    /// Power off every host in reverse topology order, continuing past
    /// failures and aggregating every error.
    pub async fn stop(&self, topology: &Topology) -> Result<OpReport> {
        let mut report = OpReport::new();
        for host in topology.iter_rev() {
            tracing::debug!(host = %host.name, "powering off");
            match self.provider.power_off(&host.name).await {
                Ok(()) => report.add_success(&host.name, HostAction::PowerOff),
                Err(e) => {
                    tracing::warn!(host = %host.name, error = %e, "power-off failed");
                    report.add_failure(&host.name, HostAction::PowerOff, e.to_string());
                }
            }
        }
        Ok(report)
    }

    /// Power off all hosts (reverse order), then power them back on
    /// (topology order). Fail-fast in both phases.
    pub async fn restart(&self, topology: &Topology) -> Result<OpReport> {
        let mut report = OpReport::new();
        for host in topology.iter_rev() {
            tracing::debug!(host = %host.name, "powering off");
            if let Err(e) = self.provider.power_off(&host.name).await {
                report.add_failure(&host.name, HostAction::PowerOff, e.to_string());
                return Ok(report);
            }
            report.add_success(&host.name, HostAction::PowerOff);
        }
        for host in topology.iter() {
            tracing::debug!(host = %host.name, "powering on");
            if let Err(e) = self.provider.power_on(&host.name).await {
                report.add_failure(&host.name, HostAction::PowerOn, e.to_string());
                return Ok(report);
            }
            report.add_success(&host.name, HostAction::PowerOn);
        }
        Ok(report)
    }

    /// Power off and deprovision every host in reverse topology order.
    ///
    /// Best-effort cleanup: every host gets a deprovision attempt even when
    /// an earlier host (or its own power-off) failed, and every failure
    /// lands in the report.
    pub async fn destroy(&self, topology: &Topology) -> Result<OpReport> {
        let mut report = OpReport::new();
        for host in topology.iter_rev() {
            tracing::debug!(host = %host.name, "powering off");
            if let Err(e) = self.provider.power_off(&host.name).await {
                // Not fatal for this host: a host that is already down or
                // half-created still needs its deprovision attempt.
                tracing::warn!(host = %host.name, error = %e, "power-off failed");
            }

            tracing::debug!(host = %host.name, "deprovisioning");
            match self.provider.deprovision(&host.name).await {
                Ok(()) => report.add_success(&host.name, HostAction::Deprovision),
                Err(e) => {
                    tracing::warn!(host = %host.name, error = %e, "deprovision failed");
                    report.add_failure(&host.name, HostAction::Deprovision, e.to_string());
                }
            }
        }
        Ok(report)
    }

    /// Query every host's state in topology order. An unreachable host
    /// reports [`HostState::Unknown`] instead of failing the command.
    pub async fn status(&self, topology: &Topology) -> Vec<StatusEntry> {
        let mut entries = Vec::with_capacity(topology.len());
        for host in topology.iter() {
            let state = match self.provider.query_state(&host.name).await {
                Ok(state) => state,
                Err(e) => {
                    tracing::debug!(host = %host.name, error = %e, "state query failed");
                    HostState::Unknown
                }
            };
            entries.push(StatusEntry {
                host: host.clone(),
                state,
            });
        }
        entries
    }

    /// Open an interactive session to one host; the coordinator when no
    /// host is named.
    pub async fn ssh(&self, topology: &Topology, host: Option<&str>) -> Result<()> {
        let name = match host {
            Some(name) => {
                if topology.find(name).is_none() {
                    return Err(ProvisionError::HostNotFound(name.to_string()));
                }
                name
            }
            None => &topology.coordinator().name,
        };
        self.provider.interactive_session(name).await
    }
}
