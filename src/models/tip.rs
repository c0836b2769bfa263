use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which team a tip favors
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Team1,
    Team2,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Team1 => "team1",
            Side::Team2 => "team2",
        }
    }
}

/// A value-betting tip for one specific map of a series.
///
/// Identity is `(match_id, game_number)`: a tip is scoped to a single game,
/// never to the whole series. Only ever constructed after every eligibility
/// gate has passed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TipRecord {
    /// Row id once stored, None before insertion
    pub id: Option<i64>,

    /// Upstream match identifier
    pub match_id: String,

    /// 1-based game number within the series this tip applies to
    pub game_number: u32,

    /// League label, carried for presentation
    pub league_name: String,

    /// Team names, carried for presentation
    pub team1_name: String,
    pub team2_name: String,

    /// The favored side
    pub recommended_side: Side,

    /// Expected value of backing the recommended side, in percent
    pub expected_value_percent: f64,

    /// Confidence in the underlying estimate, 0-100
    pub confidence_percent: f64,

    /// Whether this game is the last possible game of the series
    pub is_decider: bool,

    /// When the tip was generated
    pub generated_at: DateTime<Utc>,
}

impl TipRecord {
    /// Name of the recommended team
    pub fn recommended_team(&self) -> &str {
        match self.recommended_side {
            Side::Team1 => &self.team1_name,
            Side::Team2 => &self.team2_name,
        }
    }
}
