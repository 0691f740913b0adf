mod config;
mod console;
mod directory;
mod dispatch;
mod errors;
mod models;
mod roster;
mod selection;
mod state;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::directory::{DirectoryApi, HttpDirectoryClient};
use crate::dispatch::CallDispatcher;
use crate::roster::filter::{filter_users, FolderFilter};
use crate::roster::{RosterPoller, RosterService};
use crate::state::AppState;

/// Admin console for the AI voice-screening directory service.
#[derive(Parser, Debug)]
#[command(name = "console", version)]
struct Args {
    /// Base URL of the directory service (overrides CONSOLE_API_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Roster poll interval in seconds (overrides POLL_INTERVAL_SECS)
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Refresh once, print the full roster, and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::from_env()?;
    if let Some(url) = args.api_url {
        config.api_url = url;
    }
    if let Some(secs) = args.poll_interval {
        config.poll_interval_secs = secs;
    }

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting voice-screening console v{} against {}",
        env!("CARGO_PKG_VERSION"),
        config.api_url
    );

    let directory: Arc<dyn DirectoryApi> = Arc::new(HttpDirectoryClient::new(
        config.api_url.clone(),
        Duration::from_secs(config.request_timeout_secs),
    ));
    let roster = RosterService::new(directory.clone());
    let dispatcher = Arc::new(CallDispatcher::new(directory.clone(), roster.clone()));

    // Eager first refresh so the console never opens on an empty table.
    if let Err(e) = roster.refresh().await {
        warn!(error = %e, "initial refresh failed; starting with an empty roster");
    }

    if args.once {
        let snapshot = roster.snapshot().await;
        let view = filter_users(&snapshot.users, &FolderFilter::All);
        console::render::print_users(&view, &snapshot.folders, &snapshot.selection);
        console::render::print_summary(&snapshot);
        return Ok(());
    }

    let state = AppState {
        config: config.clone(),
        directory,
        roster: roster.clone(),
        dispatcher,
    };

    // The poller lives exactly as long as the console loop: dropping it on
    // return aborts the background task, so no refresh fires after teardown.
    let _poller = RosterPoller::start(roster, Duration::from_secs(config.poll_interval_secs));

    console::run(state).await
}
