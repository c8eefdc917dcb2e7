use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::info;

use engagement_api::config::AppConfig;
use engagement_api::db::Database;
use engagement_api::logging::init_logging;
use engagement_api::policy::PolicyStore;
use engagement_api::server::{self, AppState};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Host to bind, overriding configuration
    #[arg(long)]
    host: Option<String>,

    /// Port to bind, overriding configuration
    #[arg(long)]
    port: Option<u16>,

    /// Path to the compliance policy document, overriding configuration
    #[arg(long)]
    policies: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let mut config = AppConfig::load()?;

    // Parse command line arguments
    let cli = Cli::parse();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(policies) = cli.policies {
        config.compliance.policies_path = policies.display().to_string();
    }

    // Initialize logging
    let _guard = init_logging(
        Some(&config.get_log_level()),
        config.logging.file_path.as_deref().map(Path::new),
    )?;

    info!("Starting engagement-api server");

    // Both must be present and well-formed or startup aborts
    let db = Database::from_config(&config.database)?;
    let policies = PolicyStore::load(Path::new(&config.compliance.policies_path))?;

    let state = AppState::new(db, policies);
    server::serve(&config.server, state).await?;

    Ok(())
}
