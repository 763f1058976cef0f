//! Core domain model for clusterlab
//!
//! Defines the cluster topology — one coordinator host, N segment hosts, an
//! optional standby — and the pure generator that derives concrete host
//! names, addresses and resources from compact user parameters. Everything
//! in this crate is deterministic and free of I/O; later lifecycle verbs
//! rebuild the exact same topology by re-running the generator with the
//! parameters persisted at create time.

pub mod error;
pub mod topology;
pub mod verb;

pub use error::{Result, TopologyError};
pub use topology::{HostSpec, Role, Topology, TopologyParams, generate, valid_hostname};
pub use verb::Verb;
