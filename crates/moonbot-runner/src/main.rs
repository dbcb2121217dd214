//! MoonBot report runner entry point.
//!
//! Listens for the trigger command on the chat bridge, fetches the moon
//! extraction report, reconciles each active chunk against its mining
//! ledger, and posts the resulting report back to the channel.
//!
//! # Architecture
//!
//! ```text
//! NATS (chat) --> trigger --> report service --> reconciliation --> NATS (report)
//! ```
//!
//! Every trigger produces either the full report sequence or a single
//! failure notice.

mod config;
mod error;
mod nats;
mod runner;
mod seat;

use moonbot_core::{LedgerWindow, OreVariantTable, ReportContext};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::RunnerConfig;
use crate::nats::NatsClient;
use crate::runner::ReportRunner;
use crate::seat::SeatClient;

/// Application entry point.
///
/// Initializes logging, loads configuration from environment variables,
/// loads the ore substitution table, connects to NATS, then runs the
/// trigger loop indefinitely.
///
/// # Errors
///
/// Returns an error if initialization or the main event loop fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("moonbot-runner starting");

    let config = RunnerConfig::from_env()?;
    info!(
        nats_url = config.nats_url,
        seat_host = config.seat.host,
        trigger = config.trigger,
        fetch_timeout_ms = config.seat.timeout.as_millis(),
        ledger_bucket_secs = config.ledger_bucket_secs.get(),
        "configuration loaded"
    );

    let table = match &config.ore_table_path {
        Some(path) => OreVariantTable::from_file(path)?,
        None => OreVariantTable::builtin()?,
    };
    info!(
        variants = table.len(),
        path = ?config.ore_table_path,
        "ore substitution table loaded"
    );

    let ctx = ReportContext {
        table,
        window: LedgerWindow::new(config.ledger_bucket_secs),
    };

    let seat = SeatClient::new(&config.seat)?;
    let nats = NatsClient::connect(&config.nats_url).await?;

    let report_runner = ReportRunner::new(nats, seat, ctx, config.trigger, config.bot_user_id);

    info!("report runner initialized, entering trigger loop");
    report_runner.run().await?;

    Ok(())
}
