use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time view of one esports match, built fresh on every poll.
///
/// Constructed by the API layer from the upstream response, consumed by the
/// tip pipeline, then discarded. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSnapshot {
    /// Opaque upstream match identifier
    pub match_id: String,

    /// League/tournament label (e.g., "LPL")
    pub league_name: String,

    /// Team names as reported upstream
    pub team1_name: String,
    pub team2_name: String,

    /// Wins per team within the current best-of-N series
    pub series_wins: (u32, u32),

    /// Games in the series that already have a declared winner
    pub finished_games: u32,

    /// Draft slots for the game currently being played
    pub team1_slots: Vec<PlayerSlot>,
    pub team2_slots: Vec<PlayerSlot>,

    /// In-game statistical differentials (team1 minus team2)
    pub stats: StatDeltas,

    /// Provenance marker (e.g., "pandascore", "mock")
    pub raw_source_tag: String,

    /// When this snapshot was taken
    pub fetched_at: DateTime<Utc>,
}

/// One player slot in the draft; `champion` is absent until picked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerSlot {
    pub champion: Option<String>,
}

impl PlayerSlot {
    pub fn picked(champion: &str) -> Self {
        Self {
            champion: Some(champion.to_string()),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether this slot carries an actual selection
    pub fn has_pick(&self) -> bool {
        self.champion
            .as_deref()
            .map(|c| !c.trim().is_empty())
            .unwrap_or(false)
    }
}

/// In-game signal differentials, team1 minus team2.
///
/// The required fields are available for any live game; the optional ones are
/// corroborating signals that not every provider reports, and their presence
/// feeds the confidence score rather than the win probability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatDeltas {
    pub kill_diff: i64,
    pub gold_diff: i64,
    pub tower_diff: i64,
    pub dragon_diff: i64,
    pub baron_diff: i64,

    /// Creep score differential, when the provider reports it
    pub cs_diff: Option<i64>,

    /// Vision/ward differential, when the provider reports it
    pub vision_diff: Option<i64>,

    /// Whether first blood has been recorded for either side
    pub first_blood: Option<bool>,

    /// Whether first tower has been recorded for either side
    pub first_tower: Option<bool>,
}
