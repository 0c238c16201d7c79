use clap::{CommandFactory, Parser};
use importer::{Dispatch, ImportConfig, ImporterError, Importer};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "fgo-import")]
#[command(about = "Loads a game data JSON document into PostgreSQL", long_about = None)]
#[command(version)]
struct Cli {
    /// Input JSON document
    #[arg(long)]
    input: Option<PathBuf>,

    /// Database connection string
    #[arg(long, env = "DATABASE_URL")]
    dburl: Option<String>,

    /// Load tables one at a time instead of concurrently within a tier
    #[arg(long)]
    sequential: bool,

    #[arg(long, default_value_t = importer::config::DEFAULT_MAX_CONNECTIONS)]
    max_connections: u32,

    /// Give up on a single table's load after this many seconds
    #[arg(long, value_name = "SECONDS")]
    load_timeout: Option<u64>,

    /// Parse and clean the document without touching the database
    #[arg(long)]
    validate_only: bool,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("import={},importer={},storage={}", log_level, log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let Some(config) = build_config(&cli) else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let importer = Importer::new(config);
    match importer.run().await {
        Ok(report) => {
            if importer.config().validate_only {
                tracing::info!("✓ Validation successful!");
            } else {
                report.log_summary();
                tracing::info!(
                    "✓ Import completed successfully! ({} rows)",
                    report.rows_committed()
                );
            }
            Ok(())
        }
        Err(ImporterError::Load(report)) => {
            tracing::error!("Import failed, per-table outcome:");
            report.log_summary();
            Err(ImporterError::Load(report).into())
        }
        Err(e) => {
            tracing::error!("Import failed: {}", e);
            Err(e.into())
        }
    }
}

fn build_config(cli: &Cli) -> Option<ImportConfig> {
    let input = cli.input.clone()?;
    let dburl = match &cli.dburl {
        Some(url) => url.clone(),
        None if cli.validate_only => String::new(),
        None => return None,
    };

    let dispatch = if cli.sequential {
        Dispatch::Sequential
    } else {
        Dispatch::Concurrent
    };

    Some(
        ImportConfig::new(input, dburl)
            .with_dispatch(dispatch)
            .with_max_connections(cli.max_connections)
            .with_load_timeout(cli.load_timeout.map(Duration::from_secs))
            .validate_only(cli.validate_only),
    )
}
