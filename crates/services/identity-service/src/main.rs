//! Identity Service - HTTP server for registration, login and token validation.

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use identity_service_lib::{config::IdentityServiceConfig, MigrateAction, StoreBackend};

#[derive(Parser)]
#[command(name = "identity-service")]
#[command(author, version, about = "Identity and bearer token microservice")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Overrides IDENTITY_SERVICE_HOST
        #[arg(short = 'H', long)]
        host: Option<String>,
        /// Overrides IDENTITY_SERVICE_PORT / PORT
        #[arg(short, long)]
        port: Option<u16>,
        /// Keep users and tokens in process memory instead of Postgres
        #[arg(long)]
        in_memory: bool,
    },
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateCommands,
    },
}

#[derive(Subcommand)]
enum MigrateCommands {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Reset database and run all migrations
    Fresh,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = IdentityServiceConfig::from_env();
    tracing::debug!(?config, "Configuration loaded");

    match cli.command {
        Commands::Serve {
            host,
            port,
            in_memory,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let backend = if in_memory {
                StoreBackend::InMemory
            } else {
                StoreBackend::Postgres
            };
            identity_service_lib::run_server(config, backend).await?;
        }
        Commands::Migrate { action } => {
            let migrate_action = match action {
                MigrateCommands::Up => MigrateAction::Up,
                MigrateCommands::Down => MigrateAction::Down,
                MigrateCommands::Status => MigrateAction::Status,
                MigrateCommands::Fresh => MigrateAction::Fresh,
            };
            identity_service_lib::run_migrations(config, migrate_action).await?;
        }
    }

    Ok(())
}
