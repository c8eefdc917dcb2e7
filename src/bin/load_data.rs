use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use engagement_api::config::AppConfig;
use engagement_api::db::Database;
use engagement_api::loader;
use engagement_api::logging::init_logging;

#[derive(Parser)]
#[command(author, version, about = "Load physician and message CSVs into the engagement database", long_about = None)]
struct Cli {
    /// Path to physicians.csv
    #[arg(long, default_value = "data/physicians.csv")]
    physicians: PathBuf,

    /// Path to messages.csv
    #[arg(long, default_value = "data/messages.csv")]
    messages: PathBuf,

    /// Database path, overriding configuration
    #[arg(long)]
    database: Option<String>,
}

fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    let _guard = init_logging(Some(&config.get_log_level()), None)?;

    let database_url = cli.database.unwrap_or_else(|| config.get_database_url());
    let db = Database::new(&database_url)?;

    // Missing or malformed source files abort the load
    let (physicians, messages) = loader::load_all(&db, &cli.physicians, &cli.messages)?;
    info!(physicians, messages, "Bulk load complete");

    Ok(())
}
