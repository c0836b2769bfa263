use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::LeagueBook;
use crate::db::TipStore;
use crate::models::{MatchSnapshot, TipRecord};
use crate::notify::TelegramNotifier;
use crate::pipeline::{self, Evaluation};

/// Worker that runs the tip pipeline over incoming snapshots, deduplicates
/// against the tip store, and delivers accepted tips.
///
/// The single receiver serializes snapshots, so successive snapshots of one
/// match are always evaluated in arrival order, which is the pipeline's one
/// ordering requirement.
pub struct TipProcessorWorker {
    league_book: Arc<LeagueBook>,
    tip_store: Arc<TipStore>,
    notifier: Option<TelegramNotifier>,
    snapshot_rx: mpsc::Receiver<MatchSnapshot>,
}

impl TipProcessorWorker {
    /// Create a new tip processor worker
    pub fn new(
        league_book: Arc<LeagueBook>,
        tip_store: Arc<TipStore>,
        notifier: Option<TelegramNotifier>,
        snapshot_rx: mpsc::Receiver<MatchSnapshot>,
    ) -> Self {
        Self {
            league_book,
            tip_store,
            notifier,
            snapshot_rx,
        }
    }

    /// Run the worker loop
    pub async fn run(mut self) {
        info!("Tip processor started");

        while let Some(snapshot) = self.snapshot_rx.recv().await {
            self.process_snapshot(snapshot).await;
        }

        warn!("Tip processor channel closed");
    }

    /// Evaluate one snapshot; a failure here never affects other matches.
    async fn process_snapshot(&self, snapshot: MatchSnapshot) {
        let (max_games, thresholds) = self.league_book.rules_for(&snapshot.league_name);

        match pipeline::run(&snapshot, max_games, &thresholds) {
            Ok(Evaluation::Tip(tip)) => self.emit_tip(tip).await,
            Ok(Evaluation::Rejected(reason)) => {
                // Expected and frequent; not a failure
                debug!(
                    "No tip for match {} this cycle: {}",
                    snapshot.match_id,
                    reason.as_str()
                );
            }
            Err(e) => {
                warn!(
                    "Skipping match {} this cycle: {}",
                    snapshot.match_id, e
                );
            }
        }
    }

    /// Record and deliver a tip, at most once per (match, game).
    async fn emit_tip(&self, tip: TipRecord) {
        match self.tip_store.was_tipped(&tip.match_id, tip.game_number).await {
            Ok(true) => {
                debug!(
                    "Match {} game {} already tipped, skipping",
                    tip.match_id, tip.game_number
                );
                return;
            }
            Ok(false) => {}
            Err(e) => {
                error!("Failed to check tip history: {}", e);
                return;
            }
        }

        match self.tip_store.record_tip(&tip).await {
            Ok(true) => {}
            Ok(false) => {
                // Unique index caught a concurrent emission
                debug!(
                    "Match {} game {} recorded by another worker",
                    tip.match_id, tip.game_number
                );
                return;
            }
            Err(e) => {
                error!("Failed to record tip: {}", e);
                return;
            }
        }

        info!(
            "Tip | Match {} game {} | {} vs {} | back {} | EV {:+.1}% | conf {:.0}%",
            tip.match_id,
            tip.game_number,
            tip.team1_name,
            tip.team2_name,
            tip.recommended_team(),
            tip.expected_value_percent,
            tip.confidence_percent,
        );

        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.send_tip(&tip).await {
                error!("Failed to deliver tip: {}", e);
            }
        }
    }
}
