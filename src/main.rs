use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use driftwatch::config::Config;
use driftwatch::export;
use driftwatch::feed::flashscore::FlashscoreSource;
use driftwatch::notify::{self, TelegramNotifier};
use driftwatch::pipeline::ScanPipeline;
use driftwatch::settle::SettlementEngine;
use driftwatch::store::{CandidateStore, CheckpointStore, LedgerStore};

#[derive(Parser, Debug)]
#[command(name = "driftwatch")]
#[command(about = "Odds-drift scanner with a checkpointed settlement ledger")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Scan the whole board instead of the configured league watch-list
    #[arg(long)]
    all: bool,

    /// Re-settle a specific day file out of band (re-checks fixtures that
    /// already carry a result), then exit
    #[arg(long, value_name = "DAY_FILE")]
    resettle: Option<PathBuf>,

    /// Write the settled-candidate summary CSV, then exit
    #[arg(long)]
    csv: bool,
}

/// A day file is named after its date: `<data_dir>/results/2024-03-08.json`.
fn day_from_path(path: &Path) -> Result<NaiveDate> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(|stem| stem.parse().ok())
        .with_context(|| format!("day file name is not a date: {}", path.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("driftwatch=info")),
        )
        .init();

    let cli = Cli::parse();
    Config::load_env_file();
    let config = Config::load(&cli.config)?;

    let candidates = CandidateStore::new(&config.data_dir);
    let checkpoint = CheckpointStore::new(&config.data_dir);
    let ledger = LedgerStore::new(&config.data_dir);

    if cli.csv {
        let out = config.data_dir.join("summary.csv");
        let rows = export::write_summary_csv(&candidates, &out)?;
        info!(rows, path = %out.display(), "summary written");
        return Ok(());
    }

    let source = FlashscoreSource::new(&config.source.base_url, config.source.request_timeout_ms)?;

    // Missing credentials only mutes notifications; the pipeline runs on.
    let notifier = match Config::telegram_credentials() {
        Some((token, chat_id)) => Some(TelegramNotifier::new(token, chat_id)?),
        None => {
            warn!("TELEGRAM_TOKEN / TELEGRAM_CHAT_ID unset, notifications disabled");
            None
        }
    };

    let engine = SettlementEngine::new(&source, &candidates, &checkpoint, &ledger);

    if let Some(day_file) = cli.resettle {
        let day = day_from_path(&day_file)?;
        let summary = engine.settle_day(day, true).await?;
        if let (Some(notifier), Some(entry)) = (&notifier, &summary.ledger_entry) {
            notifier.send_or_log(&notify::render_day_result(entry)).await;
        }
        return Ok(());
    }

    // Settle the backlog before collecting today's candidates.
    let today = chrono::Local::now().date_naive();
    for summary in engine.run(today).await? {
        if let (Some(notifier), Some(entry)) = (&notifier, &summary.ledger_entry) {
            notifier.send_or_log(&notify::render_day_result(entry)).await;
        }
    }

    let leagues = if cli.all {
        vec!["all".to_string()]
    } else {
        config.leagues.clone()
    };

    let pipeline = ScanPipeline::new(&source, &config.policy, config.source.min_odds);
    let found = pipeline.scan(&leagues).await;
    let has_predictions = found.iter().any(|c| c.prediction.is_some());

    let added = candidates.upsert_day(today, found.clone())?;
    info!(added, date = %today, "day file updated");

    if has_predictions {
        if let Some(notifier) = &notifier {
            notifier.send_or_log(&notify::render_predictions(&found)).await;
        }
    }

    Ok(())
}
