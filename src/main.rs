//! # News Portal
//!
//! A live news dashboard that aggregates top headlines, falls back to a set
//! of RSS feeds when the headlines API has nothing, shows a YouTube playlist
//! alongside, and reads stories aloud.
//!
//! ## Features
//!
//! - Headlines from the GNews API in English, Tamil or Hindi
//! - Fallback to BBC News, Google News, Times of India and The Hindu RSS
//! - Every upstream fetched through a CORS relay
//! - Hourly refresh, restarted whenever the language changes
//! - Text-to-speech through an external synthesizer
//! - Optional JSON snapshot of the dashboard for other viewers
//!
//! ## Usage
//!
//! ```sh
//! news_portal --lang hi -j ./out
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: [`relay`] unwraps upstream documents, [`feeds`] parses them
//! 2. **Aggregation**: [`aggregator`] picks the primary or fallback path and
//!    [`normalize`] turns raw articles into stories
//! 3. **State**: [`dashboard`] applies results, discarding stale ones
//! 4. **Scheduling**: [`scheduler`] refreshes on activation, language change
//!    and every hour
//! 5. **Output**: [`host`] renders to the terminal, [`outputs`] writes JSON

use clap::Parser;
use std::error::Error;
use std::sync::Arc;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod aggregator;
mod cli;
mod dashboard;
mod error;
mod feeds;
mod host;
mod models;
mod normalize;
mod outputs;
mod relay;
mod scheduler;
mod speech;
mod utils;

use aggregator::NewsAggregator;
use cli::Cli;
use dashboard::Dashboard;
use outputs::json::write_snapshot;
use outputs::text::DashboardView;
use relay::Relay;
use scheduler::RefreshScheduler;
use speech::Narrator;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("news_portal starting up");

    let args = Cli::parse();
    let settings = args.settings();
    debug!(?settings.lang, %settings.relay_url, ?settings.refresh_interval, "Parsed CLI arguments");

    // Early check: ensure the snapshot dir is writable
    if let Some(dir) = &settings.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    let relay = Arc::new(Relay::new(settings.relay_url.clone(), settings.request_timeout)?);
    let aggregator = NewsAggregator::new(relay, settings.api_key.clone());
    let dashboard = Arc::new(Dashboard::new(settings.lang));
    let scheduler = RefreshScheduler::new(
        aggregator,
        Arc::clone(&dashboard),
        settings.refresh_interval,
    );

    if settings.once {
        scheduler.refresh_once().await;
        let state = dashboard.snapshot();
        println!("{}", DashboardView(&state));
        if let Some(dir) = &settings.json_output_dir {
            let path = write_snapshot(&state, dir).await?;
            info!(path = %path.display(), "Snapshot written");
        }
    } else {
        let narrator = Narrator::for_command(&settings.tts_command);
        host::run(
            scheduler,
            Arc::clone(&dashboard),
            narrator,
            settings.json_output_dir.clone(),
        )
        .await?;
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
