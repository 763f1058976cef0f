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
        format!("■ Stopping cluster '{}'...", hostname).yellow().bold()
    );
    utils::print_topology(&topology);

    let provider = utils::provider_for(record, hostname, developer)?;
    let report = Orchestrator::new(&provider).stop(&topology).await?;

    utils::finish("stop", &report)
}
