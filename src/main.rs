use std::net::SocketAddr;
use std::path::PathBuf;

use bizhub::api::{AppState, create_router};
use bizhub::config::ConfigLoader;
use bizhub::logging::{LogFormat, init_logger};
use bizhub::maintenance::{cleanup_past_reservations, ensure_cache_directories};
use bizhub::store::Store;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};

/// BizHub platform server and maintenance commands.
#[derive(Debug, Parser)]
#[command(name = "bizhub", version, about)]
struct Cli {
    /// Directory holding platform.yaml and tenants/.
    #[arg(long, env = "BIZHUB_CONFIG_DIR", default_value = "./config/default")]
    config_dir: PathBuf,

    /// JSON snapshot file for the record store (in-memory when omitted).
    #[arg(long, env = "BIZHUB_DATA_FILE")]
    data_file: Option<PathBuf>,

    /// Log output format.
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    log_format: LogFormat,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API.
    Serve {
        /// Address to listen on.
        #[arg(long, env = "BIZHUB_BIND", default_value = "0.0.0.0:8080")]
        bind: SocketAddr,
    },
    /// Create the configured cache directories.
    EnsureCacheDirs {
        /// Directory the cache paths are relative to.
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Delete reservations dated before today.
    CleanupPastDates {
        /// Treat this date as today (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

fn open_store(data_file: Option<&PathBuf>) -> Result<Store, bizhub::error::PlatformError> {
    match data_file {
        Some(path) => Store::open(path),
        None => Ok(Store::in_memory()),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logger(cli.log_format, cli.verbose);

    let config = ConfigLoader::load(&cli.config_dir).inspect_err(|e| {
        tracing::error!(error = %e, config_dir = %cli.config_dir.display(), "Failed to load configuration");
    })?;

    match cli.command {
        Command::Serve { bind } => {
            let store = open_store(cli.data_file.as_ref())?;
            if store.snapshot_path().is_none() {
                tracing::warn!("No data file configured; records are kept in memory only");
            }
            tracing::info!(
                platform = %config.platform().name,
                version = %config.platform().version,
                tenants = config.config().tenants().len(),
                "Starting API server"
            );

            let app = create_router(AppState::new(config, store));
            let listener = tokio::net::TcpListener::bind(bind).await?;
            tracing::info!(address = %bind, "Listening");
            axum::serve(listener, app).await?;
        }
        Command::EnsureCacheDirs { root } => {
            let dirs = &config.config().maintenance().cache_directories;
            for dir in ensure_cache_directories(&root, dirs)? {
                let state = if dir.created { "created" } else { "exists" };
                println!("{:>8}  {}", state, dir.path.display());
            }
        }
        Command::CleanupPastDates { today } => {
            let store = open_store(cli.data_file.as_ref())?;
            let today = today.unwrap_or_else(|| Utc::now().date_naive());
            let removed = cleanup_past_reservations(&store, today).await?;
            if removed.is_empty() {
                println!("No reservations before {}", today);
            }
            for (client, count) in removed {
                println!("{}: removed {} reservation(s)", client, count);
            }
        }
    }

    Ok(())
}
