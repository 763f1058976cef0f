use clusterlab_config::ConfigRecord;
use clusterlab_core::{Topology, TopologyParams, generate};
use clusterlab_provision::{OpReport, ProvisionError};
use clusterlab_vagrant::{ProvisionSettings, VagrantProvider};
use colored::Colorize;

/// Regenerate the topology recorded for a cluster prefix.
///
/// Derivation stays parameter-only: the record holds the create-time
/// parameters and the pure generator rebuilds the identical topology.
pub fn resolve_topology(record: &ConfigRecord, hostname: &str) -> anyhow::Result<Topology> {
    let params = record
        .cluster(hostname)
        .ok_or_else(|| ProvisionError::HostNotFound(hostname.to_string()))?;
    Ok(generate(&params)?)
}

/// Open the Vagrant provider for a cluster, with the provisioning values
/// the gate already verified.
pub fn provider_for(
    record: &ConfigRecord,
    hostname: &str,
    developer: bool,
) -> anyhow::Result<VagrantProvider> {
    let settings = ProvisionSettings {
        api_token: record.api_token().unwrap_or_default().to_string(),
        location: record.location().unwrap_or_default().to_string(),
        developer,
    };
    Ok(VagrantProvider::for_cluster(hostname, settings)?)
}

/// Open the provider for backend-wide queries. Creates no per-cluster
/// state.
pub fn backend_provider(record: &ConfigRecord, developer: bool) -> anyhow::Result<VagrantProvider> {
    let settings = ProvisionSettings {
        api_token: record.api_token().unwrap_or_default().to_string(),
        location: record.location().unwrap_or_default().to_string(),
        developer,
    };
    Ok(VagrantProvider::for_backend(settings)?)
}

/// Print the topology that a verb is about to operate on.
pub fn print_topology(topology: &Topology) {
    println!(
        "{}",
        format!("Hosts ({}):", topology.len()).bold()
    );
    for host in topology.iter() {
        println!(
            "  • {} {} {}",
            host.name.cyan(),
            format!("[{}]", host.role).dimmed(),
            host.address.to_string().dimmed()
        );
    }
}

/// Print an operation report and turn aggregate failure into a non-zero
/// exit.
pub fn finish(verb: &str, report: &OpReport) -> anyhow::Result<()> {
    if report.is_success() {
        println!();
        println!("{}", format!("✓ {} completed", verb).green().bold());
        return Ok(());
    }

    println!();
    let hosts = report.succeeded_hosts();
    if !hosts.is_empty() {
        println!("{}", "Hosts that completed:".yellow());
        for host in hosts {
            println!("  ✓ {}", host.cyan());
        }
    }
    for outcome in &report.failed {
        println!(
            "  {} {} on {}: {}",
            "✗".red(),
            outcome.action,
            outcome.host.cyan(),
            outcome.error.as_deref().unwrap_or("unknown error")
        );
    }

    anyhow::bail!("{} failed: {}", verb, report);
}

/// One-line summary of a cluster's recorded parameters.
pub fn describe_params(params: &TopologyParams) -> String {
    format!(
        "{} segment(s){}, {} cpu / {} MB per host, subnet {}",
        params.segments,
        if params.standby { " + standby" } else { "" },
        params.cpu,
        params.memory_mb,
        params.subnet
    )
}
