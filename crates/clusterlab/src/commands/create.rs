use crate::utils;
use clusterlab_config::{ConfigRecord, ConfigStore, cluster_key};
use clusterlab_core::{TopologyParams, generate};
use clusterlab_provision::Orchestrator;
use colored::Colorize;

pub async fn handle(
    store: &ConfigStore,
    record: &ConfigRecord,
    params: TopologyParams,
    developer: bool,
) -> anyhow::Result<()> {
    let topology = generate(&params)?;

    println!(
        "{}",
        format!("▶ Creating cluster '{}'...", params.hostname)
            .green()
            .bold()
    );
    println!("  {}", utils::describe_params(&params).dimmed());
    println!();
    utils::print_topology(&topology);

    if record.cluster(&params.hostname).is_some() {
        println!();
        println!(
            "  ℹ cluster '{}' was created before; its recorded parameters will be replaced",
            params.hostname.cyan()
        );
    }

    // Record the parameters before provisioning so a partially created
    // cluster can still be stopped or destroyed by prefix.
    store.set_field(&cluster_key(&params.hostname), serde_json::to_value(&params)?)?;

    let provider = utils::provider_for(record, &params.hostname, developer)?;
    let report = Orchestrator::new(&provider).create(&topology).await?;

    utils::finish("create", &report)?;
    println!(
        "  connect with: {}",
        format!("clab ssh -n {}", params.hostname).cyan()
    );
    Ok(())
}
