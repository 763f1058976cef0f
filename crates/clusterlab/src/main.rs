mod commands;
mod utils;

use clap::{Parser, Subcommand};
use clusterlab_config::ConfigStore;
use clusterlab_core::Verb;

const DEFAULT_HOSTNAME: &str = "lab";
const DEFAULT_SEGMENTS: usize = 0;
const DEFAULT_CPU: u32 = 2;
const DEFAULT_MEMORY_MB: u32 = 4096;
const DEFAULT_OS_IMAGE: &str = "bento/rockylinux-9";
const DEFAULT_SUBNET: &str = "192.168.99.100";

#[derive(Parser)]
#[command(name = "clab")]
#[command(version)]
#[command(about = "Manage local multi-host database cluster environments", long_about = None)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Provision hosts with developer build tooling
    #[arg(long, global = true)]
    developer: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the cluster environment and boot every host
    #[command(visible_alias = "c")]
    Create {
        /// CPUs per host
        #[arg(short, long, default_value_t = DEFAULT_CPU)]
        cpu: u32,
        /// Memory per host, in megabytes
        #[arg(short, long, default_value_t = DEFAULT_MEMORY_MB)]
        memory: u32,
        /// Number of segment hosts
        #[arg(short, long, default_value_t = DEFAULT_SEGMENTS)]
        segments: usize,
        /// Also create a standby host
        #[arg(long)]
        standby: bool,
        /// Base image for every host
        #[arg(short, long, default_value = DEFAULT_OS_IMAGE)]
        os: String,
        /// Subnet base address; the coordinator occupies it
        #[arg(short = 'b', long, default_value = DEFAULT_SUBNET)]
        subnet: String,
        /// Hostname prefix for the cluster
        #[arg(short = 'n', long, default_value = DEFAULT_HOSTNAME)]
        hostname: String,
    },

    /// Bring up an already-created cluster
    #[command(visible_alias = "u")]
    Up {
        /// Hostname prefix of the cluster
        #[arg(short = 'n', long, default_value = DEFAULT_HOSTNAME)]
        hostname: String,
    },

    /// SSH into a cluster host (the coordinator by default)
    Ssh {
        /// Cluster prefix, or the name of a specific host (e.g. lab-seg1)
        #[arg(short = 'n', long, default_value = DEFAULT_HOSTNAME)]
        hostname: String,
    },

    /// Stop a running cluster
    #[command(visible_alias = "s")]
    Stop {
        /// Hostname prefix of the cluster
        #[arg(short = 'n', long, default_value = DEFAULT_HOSTNAME)]
        hostname: String,
    },

    /// Show the state of every host in a cluster
    Status {
        /// Hostname prefix of the cluster
        #[arg(short = 'n', long, default_value = DEFAULT_HOSTNAME)]
        hostname: String,
    },

    /// Restart a cluster (full power-off, then power-on)
    Restart {
        /// Hostname prefix of the cluster
        #[arg(short = 'n', long, default_value = DEFAULT_HOSTNAME)]
        hostname: String,
    },

    /// Destroy a cluster and remove its hosts
    Destroy {
        /// Hostname prefix of the cluster to destroy
        #[arg(short = 'n', long, required = true)]
        hostname: String,
    },

    /// Update the stored configuration (API token, artifact location)
    #[command(name = "update-config", visible_alias = "uc")]
    UpdateConfig {
        /// API token used during provisioning
        #[arg(short, long)]
        token: Option<String>,
        /// Location of the software artifacts used to provision hosts
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Remove a cluster's entry from the configuration
    #[command(name = "delete-config", visible_alias = "dc")]
    DeleteConfig {
        /// Hostname prefix of the cluster entry to remove
        #[arg(short = 'n', long, required = true)]
        hostname: String,
    },

    /// List all known clusters and their host states
    #[command(visible_alias = "l")]
    List {
        /// Also show the backend's global view of all machines
        #[arg(short = 'g', long)]
        global_status: bool,
    },
}

impl Commands {
    fn verb(&self) -> Verb {
        match self {
            Commands::Create { .. } => Verb::Create,
            Commands::Up { .. } => Verb::Up,
            Commands::Ssh { .. } => Verb::Ssh,
            Commands::Stop { .. } => Verb::Stop,
            Commands::Status { .. } => Verb::Status,
            Commands::Restart { .. } => Verb::Restart,
            Commands::Destroy { .. } => Verb::Destroy,
            Commands::UpdateConfig { .. } => Verb::UpdateConfig,
            Commands::DeleteConfig { .. } => Verb::DeleteConfig,
            Commands::List { .. } => Verb::List,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let store = ConfigStore::open()?;
    let record = store.load()?;

    // Gate: every verb except the config verbs needs the token and the
    // artifact location. Runs once, before any provisioning action.
    clusterlab_config::check_gate(cli.command.verb(), &record)?;

    match cli.command {
        Commands::Create {
            cpu,
            memory,
            segments,
            standby,
            os,
            subnet,
            hostname,
        } => {
            let params = clusterlab_core::TopologyParams {
                hostname,
                segments,
                standby,
                cpu,
                memory_mb: memory,
                os_image: os,
                subnet,
            };
            commands::create::handle(&store, &record, params, cli.developer).await
        }
        Commands::Up { hostname } => {
            commands::up::handle(&record, &hostname, cli.developer).await
        }
        Commands::Ssh { hostname } => {
            commands::ssh::handle(&record, &hostname, cli.developer).await
        }
        Commands::Stop { hostname } => {
            commands::stop::handle(&record, &hostname, cli.developer).await
        }
        Commands::Status { hostname } => {
            commands::status::handle(&record, &hostname, cli.developer).await
        }
        Commands::Restart { hostname } => {
            commands::restart::handle(&record, &hostname, cli.developer).await
        }
        Commands::Destroy { hostname } => {
            commands::destroy::handle(&store, &record, &hostname, cli.developer).await
        }
        Commands::UpdateConfig { token, location } => {
            commands::update_config::handle(&store, token, location)
        }
        Commands::DeleteConfig { hostname } => {
            commands::delete_config::handle(&store, &record, &hostname)
        }
        Commands::List { global_status } => {
            commands::list::handle(&record, global_status, cli.developer).await
        }
    }
}
