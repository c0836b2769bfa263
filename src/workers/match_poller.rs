use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time;
use tracing::{debug, error, info, warn};

use crate::api::PandaScoreClient;
use crate::models::MatchSnapshot;

/// Worker that polls the esports API for running matches and forwards each
/// snapshot to the tip processor.
pub struct MatchPollerWorker {
    client: PandaScoreClient,
    snapshot_tx: mpsc::Sender<MatchSnapshot>,
    poll_interval: Duration,
}

impl MatchPollerWorker {
    /// Create a new match poller worker
    pub fn new(
        client: PandaScoreClient,
        snapshot_tx: mpsc::Sender<MatchSnapshot>,
        poll_interval_secs: u64,
    ) -> Self {
        Self {
            client,
            snapshot_tx,
            poll_interval: Duration::from_secs(poll_interval_secs),
        }
    }

    /// Run the worker loop
    pub async fn run(&self) {
        info!("Match poller started (interval: {:?})", self.poll_interval);

        let mut interval = time::interval(self.poll_interval);

        loop {
            interval.tick().await;
            self.poll().await;
        }
    }

    /// Perform a single poll cycle
    async fn poll(&self) {
        let snapshots = match self.client.fetch_running_matches().await {
            Ok(snapshots) => snapshots,
            Err(e) => {
                error!("Failed to fetch running matches: {}", e);
                return;
            }
        };

        if snapshots.is_empty() {
            debug!("No running matches this cycle");
            return;
        }

        debug!("Forwarding {} match snapshots", snapshots.len());

        for snapshot in snapshots {
            if let Err(e) = self.snapshot_tx.send(snapshot).await {
                warn!("Failed to forward match snapshot: {}", e);
            }
        }
    }
}
