use crate::utils;
use clusterlab_config::ConfigRecord;
use clusterlab_provision::Orchestrator;
use colored::Colorize;

pub async fn handle(
    record: &ConfigRecord,
    hostname: &str,
    developer: bool,
) -> anyhow::Result<()> {
    let topology = utils::resolve_topology(record, hostname)?;

    println!(
        "{}",
        format!("▶ Bringing up cluster '{}'...", hostname).green().bold()
    );
    utils::print_topology(&topology);

    let provider = utils::provider_for(record, hostname, developer)?;
    let report = Orchestrator::new(&provider).up(&topology).await?;

    utils::finish("up", &report)
}
