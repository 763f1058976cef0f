use crate::utils;
use clusterlab_config::ConfigRecord;
use clusterlab_provision::{HostState, Orchestrator, StatusEntry};
use colored::Colorize;

pub async fn handle(
    record: &ConfigRecord,
    hostname: &str,
    developer: bool,
) -> anyhow::Result<()> {
    let topology = utils::resolve_topology(record, hostname)?;

    println!("{}", format!("Cluster '{}'", hostname).bold());

    let provider = utils::provider_for(record, hostname, developer)?;
    let entries = Orchestrator::new(&provider).status(&topology).await;

    println!();
    print_table(&entries);
    Ok(())
}

pub fn print_table(entries: &[StatusEntry]) {
    println!(
        "{}",
        format!(
            "{:<20} {:<12} {:<16} {:<12}",
            "NAME", "ROLE", "ADDRESS", "STATE"
        )
        .bold()
    );
    println!("{}", "─".repeat(60).dimmed());

    for entry in entries {
        let state = entry.state.to_string();
        let state_colored = match entry.state {
            HostState::Running => state.green(),
            HostState::Stopped | HostState::NotCreated => state.red(),
            HostState::Unknown => state.yellow(),
        };
        println!(
            "{:<20} {:<12} {:<16} {:<12}",
            entry.host.name.cyan(),
            entry.host.role.to_string(),
            entry.host.address.to_string(),
            state_colored
        );
    }
}
