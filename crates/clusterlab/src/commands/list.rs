use crate::commands::status::print_table;
use crate::utils;
use clusterlab_config::ConfigRecord;
use clusterlab_core::generate;
use clusterlab_provision::{HostProvider, Orchestrator};
use colored::Colorize;
use std::collections::HashSet;

pub async fn handle(
    record: &ConfigRecord,
    global_status: bool,
    developer: bool,
) -> anyhow::Result<()> {
    let clusters = record.clusters();

    if clusters.is_empty() {
        println!("{}", "No clusters have been created yet".dimmed());
        println!("  start one with: {}", "clab create".cyan());
    }

    let mut known_hosts: HashSet<String> = HashSet::new();

    for (prefix, params) in &clusters {
        let topology = generate(params)?;
        for host in topology.iter() {
            known_hosts.insert(host.name.clone());
        }

        println!();
        println!("{}", format!("Cluster '{}'", prefix).bold());
        println!("  {}", utils::describe_params(params).dimmed());
        println!();

        let provider = utils::provider_for(record, prefix, developer)?;
        let entries = Orchestrator::new(&provider).status(&topology).await;
        print_table(&entries);
    }

    if global_status {
        print_global_view(record, &known_hosts, developer).await?;
    }

    Ok(())
}

/// The backend's own inventory, showing machines created outside
/// clusterlab's topologies.
async fn print_global_view(
    record: &ConfigRecord,
    known_hosts: &HashSet<String>,
    developer: bool,
) -> anyhow::Result<()> {
    println!();
    println!("{}", "Backend global status".bold());

    let provider = utils::backend_provider(record, developer)?;
    let machines = provider.global_inventory().await?;

    if machines.is_empty() {
        println!("  {}", "no machines reported by the backend".dimmed());
        return Ok(());
    }

    for machine in machines {
        let marker = if known_hosts.contains(&machine.name) {
            "•".normal()
        } else {
            "○".yellow()
        };
        println!(
            "  {} {:<20} {:<10} {}",
            marker,
            machine.name.cyan(),
            machine.state.to_string(),
            machine.origin.unwrap_or_default().dimmed()
        );
    }
    println!(
        "  {}",
        "○ = machine outside any clusterlab cluster".dimmed()
    );
    Ok(())
}
