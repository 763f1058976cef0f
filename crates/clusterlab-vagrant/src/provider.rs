//! Vagrant HostProvider implementation
//!
//! One provider instance per cluster prefix. The cluster's Vagrant
//! environment lives under the clusterlab data directory
//! (`~/.local/share/clusterlab/<prefix>/`), so every machine of a cluster
//! shares one Vagrantfile and one backend state directory.

use crate::error::{Result, VagrantError};
use crate::vagrant::Vagrant;
use crate::vagrantfile;
use async_trait::async_trait;
use clusterlab_core::{HostSpec, Topology};
use clusterlab_provision::{HostProvider, HostRecord, HostState};
use std::path::PathBuf;

/// Values baked into every provisioned host.
#[derive(Debug, Clone)]
pub struct ProvisionSettings {
    pub api_token: String,
    pub location: String,
    /// Install build tooling in the guests.
    pub developer: bool,
}

/// Vagrant-backed provider for one cluster.
pub struct VagrantProvider {
    vagrant: Vagrant,
    settings: ProvisionSettings,
}

/// Root directory for per-cluster Vagrant environments.
/// `CLUSTERLAB_DATA_DIR` overrides it (used by tests).
pub fn data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CLUSTERLAB_DATA_DIR") {
        return Ok(PathBuf::from(dir));
    }
    Ok(dirs::data_dir()
        .ok_or(VagrantError::DataDirNotFound)?
        .join("clusterlab"))
}

/// The cluster's state directory under the data directory.
///
/// Refuses any prefix that is not a plain hostname label, so a prefix can
/// never name a path outside the data directory.
fn cluster_state_dir(prefix: &str) -> Result<PathBuf> {
    if !clusterlab_core::valid_hostname(prefix) {
        return Err(VagrantError::InvalidPrefix(prefix.to_string()));
    }
    Ok(data_dir()?.join(prefix))
}

impl VagrantProvider {
    /// Open the provider for a cluster prefix, creating the state directory
    /// if needed.
    pub fn for_cluster(prefix: &str, settings: ProvisionSettings) -> Result<Self> {
        let state_dir = cluster_state_dir(prefix)?;
        if !state_dir.exists() {
            std::fs::create_dir_all(&state_dir)?;
        }
        Ok(Self {
            vagrant: Vagrant::new(state_dir),
            settings,
        })
    }

    /// Open the provider for backend-wide queries only. Touches no
    /// per-cluster state and creates no directories.
    pub fn for_backend(settings: ProvisionSettings) -> Result<Self> {
        Ok(Self {
            vagrant: Vagrant::new(data_dir()?),
            settings,
        })
    }

    /// Remove the cluster's state directory. Called after a fully
    /// successful destroy.
    pub fn remove_cluster_state(prefix: &str) -> Result<()> {
        let state_dir = cluster_state_dir(prefix)?;
        if state_dir.exists() {
            std::fs::remove_dir_all(&state_dir)?;
        }
        Ok(())
    }
}

#[async_trait]
impl HostProvider for VagrantProvider {
    fn name(&self) -> &str {
        "vagrant"
    }

    async fn prepare(&self, topology: &Topology) -> clusterlab_provision::Result<()> {
        Vagrant::check_installed().await?;
        let rendered = vagrantfile::render(topology, &self.settings);
        let path = self.vagrant.state_dir().join("Vagrantfile");
        tokio::fs::write(&path, rendered)
            .await
            .map_err(VagrantError::Io)?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }

    async fn provision(&self, host: &HostSpec) -> clusterlab_provision::Result<()> {
        // `vagrant up` creates and boots in one step and is idempotent, so
        // it serves both provision and power_on.
        self.vagrant.up(&host.name).await?;
        Ok(())
    }

    async fn power_on(&self, host: &str) -> clusterlab_provision::Result<()> {
        self.vagrant.up(host).await?;
        Ok(())
    }

    async fn power_off(&self, host: &str) -> clusterlab_provision::Result<()> {
        self.vagrant.halt(host).await?;
        Ok(())
    }

    async fn deprovision(&self, host: &str) -> clusterlab_provision::Result<()> {
        self.vagrant.destroy(host).await?;
        Ok(())
    }

    async fn query_state(&self, host: &str) -> clusterlab_provision::Result<HostState> {
        Ok(self.vagrant.status(host).await?)
    }

    async fn interactive_session(&self, host: &str) -> clusterlab_provision::Result<()> {
        Ok(self.vagrant.ssh(host).await?)
    }

    async fn global_inventory(&self) -> clusterlab_provision::Result<Vec<HostRecord>> {
        Ok(self.vagrant.global_status().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Destroy removes the state directory by prefix; a prefix that walks
    // out of the data directory must be refused before any path is built.
    #[test]
    fn test_remove_cluster_state_rejects_path_escape() {
        let dir = tempfile::tempdir().unwrap();
        let victim = dir.path().join("victim");
        std::fs::create_dir(&victim).unwrap();

        for prefix in ["../victim", "..", "victim/.."] {
            let result = VagrantProvider::remove_cluster_state(prefix);
            assert!(
                matches!(result, Err(VagrantError::InvalidPrefix(_))),
                "accepted '{}'",
                prefix
            );
        }
        assert!(victim.exists());
    }

    #[test]
    fn test_for_cluster_rejects_path_escape() {
        let settings = ProvisionSettings {
            api_token: "tok".to_string(),
            location: "/tmp/sw".to_string(),
            developer: false,
        };
        let result = VagrantProvider::for_cluster("../victim", settings);
        assert!(matches!(result, Err(VagrantError::InvalidPrefix(_))));
    }
}
