use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "docker-services")]
#[command(about = "docker-services - declarative docker service manager")]
#[command(version)]
struct Cli {
    /// Registry directory of installed services
    #[arg(long, global = true, default_value = "/etc/docker-services")]
    root: PathBuf,

    /// Directory systemd unit files are written to
    #[arg(long, global = true, default_value = "/etc/systemd/system")]
    unit_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all installed services
    List,

    /// Show a service's declaration and runtime state
    Status {
        /// Service name
        service: String,
    },

    /// Add a new service from a declaration directory
    Add {
        /// Directory containing service.json
        path: PathBuf,
    },

    /// Remove a service
    Remove {
        /// Service name
        service: String,
    },

    /// Recreate all containers
    Rebuild,

    /// Start a service
    Start {
        /// Service name
        service: String,

        /// Stay attached in the foreground instead of starting detached
        #[arg(long)]
        no_daemon: bool,
    },

    /// Stop a service
    Stop {
        /// Service name
        service: String,
    },

    /// Restart a service
    Restart {
        /// Service name
        service: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::List => commands::list::run(&cli.root, &cli.unit_dir),
        Commands::Status { service } => commands::status::run(&cli.root, &cli.unit_dir, &service),
        Commands::Add { path } => commands::add::run(&cli.root, &cli.unit_dir, &path),
        Commands::Remove { service } => commands::remove::run(&cli.root, &cli.unit_dir, &service),
        Commands::Rebuild => commands::rebuild::run(&cli.root, &cli.unit_dir),
        Commands::Start { service, no_daemon } => {
            commands::start::run(&cli.root, &cli.unit_dir, &service, no_daemon)
        }
        Commands::Stop { service } => commands::stop::run(&cli.root, &cli.unit_dir, &service),
        Commands::Restart { service } => {
            commands::restart::run(&cli.root, &cli.unit_dir, &service)
        }
    }
}
