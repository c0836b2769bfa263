mod api;
mod config;
mod db;
mod models;
mod notify;
mod pipeline;
mod workers;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::PandaScoreClient;
use crate::config::{Config, LeagueBook};
use crate::db::TipStore;
use crate::notify::TelegramNotifier;
use crate::workers::{MatchPollerWorker, TipProcessorWorker};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lol_tipster=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting lol-tipster");

    // Load configuration
    let config = Config::from_env()?;
    info!("Configuration loaded");

    // Initialize database
    let tip_store = Arc::new(TipStore::new(&config.database_url).await?);
    info!("Database initialized");

    // Load per-league series formats and threshold overrides
    let league_book = Arc::new(load_league_book(&config)?);
    info!("League book initialized");

    // Initialize API client
    let pandascore_client =
        PandaScoreClient::new(&config.pandascore_api_url, &config.pandascore_api_token);
    info!("API client initialized");

    // Telegram delivery is optional; without it tips are only logged/stored
    let notifier = match &config.telegram {
        Some(tg) => {
            info!("Telegram delivery enabled for chat {}", tg.chat_id);
            Some(TelegramNotifier::new(&tg.bot_token, tg.chat_id))
        }
        None => {
            info!("No Telegram credentials, tips will be logged only");
            None
        }
    };

    // Channel for match snapshots
    let (snapshot_tx, snapshot_rx) = mpsc::channel(100);

    // Create workers
    let match_poller =
        MatchPollerWorker::new(pandascore_client, snapshot_tx, config.match_poll_interval);

    let tip_processor = TipProcessorWorker::new(
        Arc::clone(&league_book),
        Arc::clone(&tip_store),
        notifier,
        snapshot_rx,
    );

    info!("Workers created, starting...");

    // Spawn workers
    let poller_handle = tokio::spawn(async move {
        match_poller.run().await;
    });

    let processor_handle = tokio::spawn(async move {
        tip_processor.run().await;
    });

    info!("All workers started");

    // Wait for shutdown signal
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        result = poller_handle => {
            error!("Match poller exited unexpectedly: {:?}", result);
        }
        result = processor_handle => {
            error!("Tip processor exited unexpectedly: {:?}", result);
        }
    }

    info!("Shutting down lol-tipster");
    Ok(())
}

/// Load league formats from JSON file or fall back to global defaults
fn load_league_book(config: &Config) -> Result<LeagueBook> {
    let formats_path = Path::new("data/league_formats.json");

    if formats_path.exists() {
        LeagueBook::load_from_file(formats_path, config.thresholds)
    } else {
        info!("No league formats file found, using defaults");
        Ok(LeagueBook::new(config.thresholds))
    }
}
