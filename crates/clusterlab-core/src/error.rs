//! Topology error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TopologyError {
    #[error("invalid subnet base address '{0}': expected an IPv4 address like 192.168.99.100")]
    InvalidSubnet(String),

    #[error("invalid resource allocation: cpu and memory must be positive (got cpu={cpu}, memory={memory_mb}MB)")]
    InvalidResources { cpu: u32, memory_mb: u32 },

    #[error("hostname prefix must not be empty")]
    EmptyHostname,

    #[error(
        "invalid hostname prefix '{0}': use lowercase letters, digits and hyphens, starting with a letter or digit"
    )]
    InvalidHostname(String),

    #[error("subnet base {0} leaves no room for {1} hosts")]
    AddressSpaceExhausted(String, usize),
}

pub type Result<T> = std::result::Result<T, TopologyError>;
