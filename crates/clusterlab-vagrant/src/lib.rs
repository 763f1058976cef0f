//! Vagrant provisioning backend for clusterlab
//!
//! Wraps the `vagrant` CLI: one state directory (and generated multi-machine
//! Vagrantfile) per cluster prefix, `--machine-readable` output parsing for
//! state queries, and an inherited-terminal `vagrant ssh` for interactive
//! sessions.

pub mod error;
pub mod provider;
pub mod vagrant;
pub mod vagrantfile;

pub use error::{Result, VagrantError};
pub use provider::{ProvisionSettings, VagrantProvider};
pub use vagrant::Vagrant;
