use crate::utils;
use clusterlab_config::ConfigRecord;
use clusterlab_provision::{Orchestrator, ProvisionError};
use colored::Colorize;

/// Resolve the target: a bare cluster prefix lands on its coordinator; a
/// member name (e.g. `lab-seg1`) is searched across every known cluster.
fn resolve_target(record: &ConfigRecord, hostname: &str) -> anyhow::Result<(String, Option<String>)> {
    if record.cluster(hostname).is_some() {
        return Ok((hostname.to_string(), None));
    }

    for (prefix, _params) in record.clusters() {
        let topology = utils::resolve_topology(record, &prefix)?;
        if topology.find(hostname).is_some() {
            return Ok((prefix, Some(hostname.to_string())));
        }
    }

    Err(ProvisionError::HostNotFound(hostname.to_string()).into())
}

pub async fn handle(
    record: &ConfigRecord,
    hostname: &str,
    developer: bool,
) -> anyhow::Result<()> {
    let (prefix, host) = resolve_target(record, hostname)?;
    let topology = utils::resolve_topology(record, &prefix)?;

    let target = host.as_deref().unwrap_or(&topology.coordinator().name);
    println!("{}", format!("▶ Connecting to '{}'...", target).green());

    let provider = utils::provider_for(record, &prefix, developer)?;
    Orchestrator::new(&provider)
        .ssh(&topology, host.as_deref())
        .await?;
    Ok(())
}
