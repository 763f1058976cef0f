//! Provisioning backend abstraction and lifecycle orchestration
//!
//! The [`HostProvider`] trait is the boundary to the external provisioning
//! backend: the orchestrator only depends on per-host success/failure and
//! reported state, never on how the backend is invoked. The
//! [`Orchestrator`] maps each lifecycle verb onto the correct per-host
//! sequence — topology order for start-like verbs, reverse order for
//! teardown — with the verb's failure-containment policy.

pub mod error;
pub mod orchestrator;
pub mod provider;
pub mod report;

pub use error::{HostAction, ProvisionError, Result};
pub use orchestrator::{Orchestrator, StatusEntry};
pub use provider::{HostProvider, HostRecord, HostState};
pub use report::{HostOutcome, OpReport};
