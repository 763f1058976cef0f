use clusterlab_config::{ConfigStore, KEY_API_TOKEN, KEY_LOCATION};
use colored::Colorize;
use serde_json::json;

pub fn handle(
    store: &ConfigStore,
    token: Option<String>,
    location: Option<String>,
) -> anyhow::Result<()> {
    if token.is_none() && location.is_none() {
        anyhow::bail!(
            "nothing to update: pass --token and/or --location (see: clab update-config --help)"
        );
    }

    if let Some(token) = token {
        store.set_field(KEY_API_TOKEN, json!(token))?;
        println!("  ✓ API token updated");
    }
    if let Some(location) = location {
        store.set_field(KEY_LOCATION, json!(location))?;
        println!("  ✓ artifact location updated");
    }

    println!();
    println!(
        "{}",
        format!("✓ configuration written to {}", store.path().display())
            .green()
    );
    Ok(())
}
