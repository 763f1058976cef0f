//! Vagrantfile generation
//!
//! Renders one multi-machine Vagrantfile per cluster. Machines are defined
//! in topology order; each gets its hostname, a private-network address and
//! the uniform cpu/memory allocation. The setup provisioner records the
//! credentials and artifact location on every host so in-guest tooling can
//! pick them up.

use clusterlab_core::Topology;
use crate::provider::ProvisionSettings;

/// Base host setup script. Receives the API token and artifact location via
/// provisioner env.
pub const HOST_SETUP: &str = r#"#!/bin/bash
set -e

mkdir -p /etc/clusterlab
cat > /etc/clusterlab/environment <<EOF
CLUSTERLAB_API_TOKEN=${CLUSTERLAB_API_TOKEN}
CLUSTERLAB_LOCATION=${CLUSTERLAB_LOCATION}
EOF
chmod 600 /etc/clusterlab/environment
"#;

/// Additional tooling for `--developer` runs: the packages needed to build
/// the cluster software inside the guest.
pub const DEVELOPER_SETUP: &str = r#"#!/bin/bash
set -e

if command -v dnf &> /dev/null; then
    dnf install -y git gcc make tar
elif command -v yum &> /dev/null; then
    yum install -y git gcc make tar
elif command -v apt-get &> /dev/null; then
    apt-get update && apt-get install -y git gcc make tar
fi
"#;

/// Render the Vagrantfile for a topology.
pub fn render(topology: &Topology, settings: &ProvisionSettings) -> String {
    let mut out = String::new();
    out.push_str("# Generated by clusterlab. Do not edit; it is rewritten on every create.\n");
    out.push_str("Vagrant.configure(\"2\") do |config|\n");

    for host in topology.iter() {
        out.push_str(&format!(
            r#"  config.vm.define "{name}" do |node|
    node.vm.box = "{image}"
    node.vm.hostname = "{name}"
    node.vm.network "private_network", ip: "{address}"
    node.vm.provider "virtualbox" do |vb|
      vb.name = "{name}"
      vb.cpus = {cpu}
      vb.memory = {memory}
    end
    node.vm.provision "shell", env: {{
      "CLUSTERLAB_API_TOKEN" => "{token}",
      "CLUSTERLAB_LOCATION" => "{location}"
    }}, inline: <<-'SETUP'
{setup}    SETUP
"#,
            name = host.name,
            image = escape(&host.os_image),
            address = host.address,
            cpu = host.cpu,
            memory = host.memory_mb,
            token = escape(&settings.api_token),
            location = escape(&settings.location),
            setup = indent(HOST_SETUP, 6),
        ));

        if settings.developer {
            out.push_str(&format!(
                "    node.vm.provision \"shell\", inline: <<-'DEVSETUP'\n{}    DEVSETUP\n",
                indent(DEVELOPER_SETUP, 6)
            ));
        }

        out.push_str("  end\n");
    }

    out.push_str("end\n");
    out
}

/// Escape a value for embedding in a double-quoted Ruby string.
fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('#', "\\#")
}

fn indent(script: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    script
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::from("\n")
            } else {
                format!("{}{}\n", pad, line)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterlab_core::{TopologyParams, generate};

    fn settings(developer: bool) -> ProvisionSettings {
        ProvisionSettings {
            api_token: "tok-123".to_string(),
            location: "/opt/artifacts".to_string(),
            developer,
        }
    }

    fn topology() -> Topology {
        generate(&TopologyParams {
            hostname: "lab".to_string(),
            segments: 2,
            standby: true,
            cpu: 2,
            memory_mb: 4096,
            os_image: "bento/rockylinux-9".to_string(),
            subnet: "192.168.99.100".to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_render_defines_every_machine() {
        let rendered = render(&topology(), &settings(false));
        for name in ["lab", "lab-seg1", "lab-seg2", "lab-standby"] {
            assert!(
                rendered.contains(&format!("config.vm.define \"{}\"", name)),
                "missing machine {}",
                name
            );
        }
        assert!(rendered.contains("ip: \"192.168.99.100\""));
        assert!(rendered.contains("ip: \"192.168.99.103\""));
        assert!(rendered.contains("vb.cpus = 2"));
        assert!(rendered.contains("vb.memory = 4096"));
        assert!(rendered.contains("bento/rockylinux-9"));
    }

    #[test]
    fn test_render_embeds_credentials() {
        let rendered = render(&topology(), &settings(false));
        assert!(rendered.contains("\"CLUSTERLAB_API_TOKEN\" => \"tok-123\""));
        assert!(rendered.contains("\"CLUSTERLAB_LOCATION\" => \"/opt/artifacts\""));
    }

    #[test]
    fn test_developer_flag_adds_tooling_provisioner() {
        let plain = render(&topology(), &settings(false));
        let dev = render(&topology(), &settings(true));
        assert!(!plain.contains("DEVSETUP"));
        assert!(dev.contains("DEVSETUP"));
        assert!(dev.contains("gcc"));
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape(r#"a"b"#), r#"a\"b"#);
        assert_eq!(escape(r"a\b"), r"a\\b");
    }
}
