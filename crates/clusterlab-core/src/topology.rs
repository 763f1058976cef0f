//! Cluster topology model and generator
//!
//! A topology is an ordered list of host specifications: coordinator first,
//! segments in ascending index order, standby last. That order is the
//! creation/start order; teardown walks it in reverse. Name and address
//! derivation is a pure function of the user parameters, so any verb can
//! reconstruct the topology without reading back create-time state.

use crate::error::{Result, TopologyError};
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;

/// Role of a host within the cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Coordinator,
    Segment,
    Standby,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Coordinator => write!(f, "coordinator"),
            Role::Segment => write!(f, "segment"),
            Role::Standby => write!(f, "standby"),
        }
    }
}

/// Identity and resources of one virtual host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostSpec {
    pub role: Role,

    /// Ordinal among hosts of the same role (always 0 for the coordinator
    /// and the standby).
    pub index: usize,

    /// Derived host identifier, unique within the topology.
    pub name: String,

    /// Derived private-network address, unique within the topology.
    pub address: Ipv4Addr,

    pub cpu: u32,
    pub memory_mb: u32,
    pub os_image: String,
}

/// User parameters a topology is generated from.
///
/// Persisted verbatim in the configuration store at create time so later
/// verbs can regenerate the identical topology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyParams {
    /// Hostname prefix; the coordinator gets the bare prefix.
    pub hostname: String,
    /// Number of segment hosts (0 is valid: coordinator-only cluster).
    pub segments: usize,
    /// Whether a standby host is part of the cluster.
    pub standby: bool,
    pub cpu: u32,
    pub memory_mb: u32,
    pub os_image: String,
    /// Base address; the coordinator occupies it, every further host
    /// increments from it.
    pub subnet: String,
}

/// Ordered set of host specifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    pub hosts: Vec<HostSpec>,
}

impl Topology {
    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// Hosts in start order (coordinator, segments ascending, standby).
    pub fn iter(&self) -> impl Iterator<Item = &HostSpec> {
        self.hosts.iter()
    }

    /// Hosts in teardown order (reverse of start order).
    pub fn iter_rev(&self) -> impl Iterator<Item = &HostSpec> {
        self.hosts.iter().rev()
    }

    /// The coordinator host. Every topology has exactly one.
    pub fn coordinator(&self) -> &HostSpec {
        &self.hosts[0]
    }

    pub fn find(&self, name: &str) -> Option<&HostSpec> {
        self.hosts.iter().find(|h| h.name == name)
    }
}

/// Whether a hostname prefix is a DNS-style label: lowercase letters,
/// digits and hyphens, starting with a letter or digit.
///
/// The prefix becomes a host identifier, a backend state directory name and
/// a value inside the generated backend configuration, so anything outside
/// this charset (path separators, `..`, quotes) must be rejected here.
pub fn valid_hostname(prefix: &str) -> bool {
    let mut chars = prefix.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c.is_ascii_digit() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Derive the host identifier for a role/index under a hostname prefix.
///
/// Segment suffixes are 1-based for readability (`lab-seg1` is the segment
/// with index 0).
pub fn host_name(prefix: &str, role: Role, index: usize) -> String {
    match role {
        Role::Coordinator => prefix.to_string(),
        Role::Segment => format!("{}-seg{}", prefix, index + 1),
        Role::Standby => format!("{}-standby", prefix),
    }
}

/// Generate the topology for the given parameters.
///
/// Pure and deterministic: identical parameters always yield an identical
/// topology, including ordering and derived identifiers.
pub fn generate(params: &TopologyParams) -> Result<Topology> {
    if params.hostname.trim().is_empty() {
        return Err(TopologyError::EmptyHostname);
    }
    if !valid_hostname(&params.hostname) {
        return Err(TopologyError::InvalidHostname(params.hostname.clone()));
    }
    if params.cpu == 0 || params.memory_mb == 0 {
        return Err(TopologyError::InvalidResources {
            cpu: params.cpu,
            memory_mb: params.memory_mb,
        });
    }

    let base: Ipv4Addr = params
        .subnet
        .parse()
        .map_err(|_| TopologyError::InvalidSubnet(params.subnet.clone()))?;
    let base = u32::from(base);

    let host_count = 1 + params.segments + usize::from(params.standby);
    // Last offset is segments + 1 when a standby exists, segments otherwise.
    let last_offset = params.segments + usize::from(params.standby);
    if base.checked_add(last_offset as u32).is_none() {
        return Err(TopologyError::AddressSpaceExhausted(
            params.subnet.clone(),
            host_count,
        ));
    }

    let make_host = |role: Role, index: usize, offset: u32| HostSpec {
        role,
        index,
        name: host_name(&params.hostname, role, index),
        address: Ipv4Addr::from(base + offset),
        cpu: params.cpu,
        memory_mb: params.memory_mb,
        os_image: params.os_image.clone(),
    };

    let mut hosts = Vec::with_capacity(host_count);
    hosts.push(make_host(Role::Coordinator, 0, 0));
    for i in 0..params.segments {
        hosts.push(make_host(Role::Segment, i, 1 + i as u32));
    }
    if params.standby {
        hosts.push(make_host(Role::Standby, 0, 1 + params.segments as u32));
    }

    Ok(Topology { hosts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn params(segments: usize, standby: bool) -> TopologyParams {
        TopologyParams {
            hostname: "lab".to_string(),
            segments,
            standby,
            cpu: 2,
            memory_mb: 4096,
            os_image: "bento/rockylinux-9".to_string(),
            subnet: "192.168.99.100".to_string(),
        }
    }

    #[test]
    fn test_host_count_and_uniqueness() {
        for segments in 0..=5 {
            for standby in [false, true] {
                let topo = generate(&params(segments, standby)).unwrap();
                assert_eq!(topo.len(), 1 + segments + usize::from(standby));

                let names: HashSet<_> = topo.iter().map(|h| h.name.clone()).collect();
                let addrs: HashSet<_> = topo.iter().map(|h| h.address).collect();
                assert_eq!(names.len(), topo.len(), "duplicate host name");
                assert_eq!(addrs.len(), topo.len(), "duplicate host address");
            }
        }
    }

    #[test]
    fn test_deterministic() {
        let a = generate(&params(3, true)).unwrap();
        let b = generate(&params(3, true)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_ordering_invariant() {
        let topo = generate(&params(4, true)).unwrap();
        let roles: Vec<Role> = topo.iter().map(|h| h.role).collect();
        assert_eq!(roles[0], Role::Coordinator);
        assert_eq!(roles.last(), Some(&Role::Standby));

        let segment_indexes: Vec<usize> = topo
            .iter()
            .filter(|h| h.role == Role::Segment)
            .map(|h| h.index)
            .collect();
        assert_eq!(segment_indexes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_name_and_address_derivation() {
        let topo = generate(&params(2, true)).unwrap();
        let names: Vec<&str> = topo.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, vec!["lab", "lab-seg1", "lab-seg2", "lab-standby"]);

        let addrs: Vec<String> = topo.iter().map(|h| h.address.to_string()).collect();
        assert_eq!(
            addrs,
            vec![
                "192.168.99.100",
                "192.168.99.101",
                "192.168.99.102",
                "192.168.99.103"
            ]
        );
    }

    #[test]
    fn test_coordinator_only_is_valid() {
        let topo = generate(&params(0, false)).unwrap();
        assert_eq!(topo.len(), 1);
        assert_eq!(topo.coordinator().name, "lab");
    }

    #[test]
    fn test_standby_without_segments() {
        let topo = generate(&params(0, true)).unwrap();
        assert_eq!(topo.len(), 2);
        assert_eq!(topo.hosts[1].name, "lab-standby");
        assert_eq!(topo.hosts[1].address.to_string(), "192.168.99.101");
    }

    #[test]
    fn test_octet_carry() {
        let mut p = params(3, false);
        p.subnet = "192.168.99.254".to_string();
        let topo = generate(&p).unwrap();
        let addrs: Vec<String> = topo.iter().map(|h| h.address.to_string()).collect();
        assert_eq!(
            addrs,
            vec![
                "192.168.99.254",
                "192.168.99.255",
                "192.168.100.0",
                "192.168.100.1"
            ]
        );
    }

    #[test]
    fn test_invalid_subnet() {
        let mut p = params(1, false);
        p.subnet = "not-an-address".to_string();
        assert!(matches!(
            generate(&p),
            Err(TopologyError::InvalidSubnet(_))
        ));
    }

    #[test]
    fn test_invalid_resources() {
        let mut p = params(1, false);
        p.cpu = 0;
        assert!(matches!(
            generate(&p),
            Err(TopologyError::InvalidResources { .. })
        ));
    }

    #[test]
    fn test_hostname_must_be_a_plain_label() {
        for hostname in ["../victim", "..", "a/b", "lab victim", "-lab", "Lab", "lab\"x"] {
            let mut p = params(1, false);
            p.hostname = hostname.to_string();
            assert!(
                matches!(generate(&p), Err(TopologyError::InvalidHostname(_))),
                "accepted '{}'",
                hostname
            );
        }
        for hostname in ["lab", "lab-2", "9lab"] {
            let mut p = params(1, false);
            p.hostname = hostname.to_string();
            assert!(generate(&p).is_ok(), "rejected '{}'", hostname);
        }
    }

    #[test]
    fn test_find() {
        let topo = generate(&params(2, false)).unwrap();
        assert!(topo.find("lab-seg2").is_some());
        assert!(topo.find("lab-seg3").is_none());
    }
}
