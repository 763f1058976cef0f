use clusterlab_config::{ConfigRecord, ConfigStore, cluster_key};
use clusterlab_provision::ProvisionError;
use colored::Colorize;

pub fn handle(
    store: &ConfigStore,
    record: &ConfigRecord,
    hostname: &str,
) -> anyhow::Result<()> {
    if record.cluster(hostname).is_none() {
        // Deleting an entry that never existed is almost certainly a typo;
        // refusing keeps the user from believing a real cluster was removed.
        return Err(ProvisionError::HostNotFound(hostname.to_string()).into());
    }

    store.delete_field(&cluster_key(hostname))?;
    println!(
        "{}",
        format!("✓ removed configuration entry for cluster '{}'", hostname).green()
    );
    println!(
        "  {}",
        "the cluster's virtual machines, if any, are untouched (see: clab destroy)".dimmed()
    );
    Ok(())
}
