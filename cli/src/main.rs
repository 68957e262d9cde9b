//! trustscan — batch trust-line verification against a ledger node.

mod config;

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use trustscan_client::WsLedgerClient;
use trustscan_report::{format_summary, load_accounts, write_results};
use trustscan_utils::format_duration_ms;
use trustscan_verifier::{progress_channel, BatchVerifier};

#[derive(Parser)]
#[command(name = "trustscan", about = "Check which accounts hold a trust line for a given asset")]
pub struct Cli {
    /// WebSocket URL of the ledger node (ws:// or wss://).
    #[arg(long, env = "XRPL_WEBSOCKET_URL")]
    url: Option<String>,

    /// Issuer account of the target asset. Accepts `prefix.address` form.
    #[arg(long, env = "TOKEN_ISSUER")]
    issuer: Option<String>,

    /// Currency code of the target asset (3-character, 40-hex, or an ASCII
    /// name that will be normalized to the 40-hex form).
    #[arg(long, env = "TOKEN_CURRENCY")]
    currency: Option<String>,

    /// Input CSV with an `address` column.
    #[arg(long, env = "INPUT_CSV")]
    input: Option<PathBuf>,

    /// Output CSV for per-account results.
    #[arg(long, env = "OUTPUT_CSV")]
    output: Option<PathBuf>,

    /// Maximum simultaneously in-flight account queries.
    #[arg(long, env = "TRUSTSCAN_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Retry attempts per account on transient errors.
    #[arg(long, env = "TRUSTSCAN_MAX_RETRIES")]
    max_retries: Option<u32>,

    /// First backoff delay in milliseconds.
    #[arg(long, env = "TRUSTSCAN_BACKOFF_BASE_MS")]
    backoff_base_ms: Option<u64>,

    /// Backoff ceiling in milliseconds.
    #[arg(long, env = "TRUSTSCAN_BACKOFF_MAX_MS")]
    backoff_max_ms: Option<u64>,

    /// Per-account deadline in milliseconds, retries included.
    #[arg(long, env = "TRUSTSCAN_PER_ACCOUNT_TIMEOUT_MS")]
    per_account_timeout_ms: Option<u64>,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[arg(long, default_value = "info", env = "TRUSTSCAN_LOG_LEVEL")]
    log_level: String,

    /// Path to a TOML configuration file. Flags and env vars override it.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    trustscan_utils::init_tracing(&cli.log_level);

    let settings = config::Settings::resolve(&cli)?;
    info!(
        asset = %settings.asset,
        url = %settings.url,
        "checking trust lines"
    );

    let accounts = load_accounts(&settings.input)?;

    let client = Arc::new(WsLedgerClient::connect(&settings.url).await?);

    let (progress_tx, mut progress_rx) = progress_channel();
    let verifier = BatchVerifier::new(client, settings.asset.clone(), settings.verify.clone())?
        .with_progress(progress_tx);

    // Ctrl-C / SIGTERM cancels in-flight work; settled results are kept.
    let cancel = verifier.cancel_handle();
    tokio::spawn(async move { cancel.wait_for_signal().await });

    let printer = tokio::spawn(async move {
        while let Some(event) = progress_rx.recv().await {
            info!(
                "[{}/{}] {} {}",
                event.completed, event.total, event.account, event.outcome_tag
            );
        }
    });

    let started = Instant::now();
    let report = verifier.verify_batch(&accounts).await;
    drop(verifier); // closes the progress channel
    let _ = printer.await;

    write_results(&settings.output, &report.results)?;
    print!("{}", format_summary(&report.summary));
    info!(
        "run completed in {}",
        format_duration_ms(started.elapsed().as_millis() as u64)
    );
    if report.summary.error_count > 0 {
        warn!(
            errors = report.summary.error_count,
            "some accounts could not be verified; see the error column"
        );
    }

    Ok(())
}
