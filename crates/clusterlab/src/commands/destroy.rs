use crate::utils;
use clusterlab_config::{ConfigRecord, ConfigStore, cluster_key};
use clusterlab_provision::Orchestrator;
use clusterlab_vagrant::VagrantProvider;
use colored::Colorize;

pub async fn handle(
    store: &ConfigStore,
    record: &ConfigRecord,
    hostname: &str,
    developer: bool,
) -> anyhow::Result<()> {
    let topology = utils::resolve_topology(record, hostname)?;

    println!(
        "{}",
        format!("■ Destroying cluster '{}'...", hostname).red().bold()
    );
    utils::print_topology(&topology);

    let provider = utils::provider_for(record, hostname, developer)?;
    let report = Orchestrator::new(&provider).destroy(&topology).await?;

    if report.is_success() {
        // Forget the cluster only after every host is gone, so a partial
        // destroy can be re-run against the same prefix.
        store.delete_field(&cluster_key(hostname))?;
        VagrantProvider::remove_cluster_state(hostname)?;
    }

    utils::finish("destroy", &report)
}
