//! # chips-runner
//!
//! Command-line front end for the broker-chips pipeline.
//!
//! Loads a JSON configuration file, builds the archive source, resolver and
//! query engine, and prints broker summaries as a table or JSON.
//!
//! # Usage
//!
//! ```bash
//! chips --config chips.json query 2330 --start 20251101 --end 20251111
//! chips --config chips.json dates --limit 20
//! chips upload ./2330.csv --json
//! ```

mod render;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chips_core::config::AppConfig;
use chips_core::{QueryState, StockQuery};
use chips_ledger::archive::{self, ArchiveCache, ArchiveResolver};
use chips_ledger::{QueryEngine, QuerySession};
use clap::{Parser, Subcommand};
use tracing::info;

use crate::render::RenderOptions;

/// Broker-chips ledger query tool.
#[derive(Parser)]
#[command(name = "chips", about = "Taiwan broker ledger (chips) aggregation")]
struct Cli {
    /// Configuration file path (JSON). Required for `query` and `dates`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short, long, default_value = "info", global = true)]
    log_level: String,

    /// Optional log directory for file output (overrides the config).
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Aggregate one stock's broker ledgers over a date range.
    Query {
        /// Stock code, e.g. `2330`.
        stock: String,
        /// Inclusive start date (YYYYMMDD).
        #[arg(long)]
        start: String,
        /// Inclusive end date (YYYYMMDD). Defaults to `start`.
        #[arg(long)]
        end: Option<String>,
        #[command(flatten)]
        render: RenderArgs,
    },
    /// List available trading dates, newest first.
    Dates {
        #[arg(long, default_value_t = 30)]
        limit: usize,
    },
    /// Parse a single ledger CSV from disk.
    Upload {
        file: PathBuf,
        #[command(flatten)]
        render: RenderArgs,
    },
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Print JSON instead of a table.
    #[arg(long)]
    json: bool,
    /// Number of summary rows to print (0 = all).
    #[arg(long, default_value_t = 20)]
    top: usize,
    /// Also print a price histogram with this bin width.
    #[arg(long)]
    bin_width: Option<f64>,
    /// Top-N used for the concentration figure.
    #[arg(long, default_value_t = 15)]
    concentration: usize,
}

impl From<&RenderArgs> for RenderOptions {
    fn from(a: &RenderArgs) -> Self {
        RenderOptions { json: a.json, top: a.top, bin_width: a.bin_width, concentration_top: a.concentration }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load configuration (optional for uploads)
    let config = match &cli.config {
        Some(path) => Some(
            chips_core::config::load_config(path)
                .with_context(|| format!("loading config {}", path.display()))?,
        ),
        None => None,
    };

    // 2. Initialize logging
    let module_name = config.as_ref().map(AppConfig::module_name).unwrap_or_else(|| "chips".to_string());
    let log_dir = cli.log_dir.clone().or_else(|| config.as_ref().and_then(AppConfig::log_path));
    chips_core::logging::init_logging(&cli.log_level, log_dir.as_deref(), &module_name);

    // 3. Dispatch
    match &cli.command {
        Command::Query { stock, start, end, render } => {
            let engine = build_engine(require_config(config.as_ref())?)?;
            let query = StockQuery::new(stock.as_str(), start.as_str(), end.as_deref().unwrap_or(start));

            let mut session = QuerySession::new(engine);
            session.submit(query.clone());
            match session.wait_settled().await {
                QueryState::Success { result, .. } => {
                    render::print_result(&query.stock_code, &result, &render.into())?;
                }
                QueryState::Error { message, .. } => bail!("{}: {message}", query.stock_code),
                other => bail!("query did not settle: {other:?}"),
            }
        }
        Command::Dates { limit } => {
            let engine = build_engine(require_config(config.as_ref())?)?;
            let index = engine.date_index().await?;
            info!("{} trading date(s) available", index.len());
            for date in index.iter().take(*limit) {
                println!("{date}");
            }
        }
        Command::Upload { file, render } => {
            let upload = chips_ledger::upload::parse_upload(file)
                .await
                .with_context(|| format!("parsing {}", file.display()))?;
            info!(stock = %upload.stock_code, encoding = ?upload.encoding, layout = ?upload.layout, "upload parsed");
            render::print_result(&upload.stock_code, &upload.result, &render.into())?;
        }
    }

    Ok(())
}

fn require_config(config: Option<&AppConfig>) -> Result<&AppConfig> {
    config.context("--config is required for this command")
}

fn build_engine(config: &AppConfig) -> Result<Arc<QueryEngine>> {
    let source = archive::source_from_config(config)?;
    info!(
        source = source.name(),
        cache_capacity = config.effective_cache_capacity(),
        batch_size = config.effective_batch_size(),
        "archive source ready"
    );
    let resolver = Arc::new(ArchiveResolver::new(source, ArchiveCache::new(config.effective_cache_capacity())));
    Ok(Arc::new(QueryEngine::new(resolver, config.effective_batch_size())))
}
