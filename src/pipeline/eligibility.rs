//! The final accept/reject decision for one (match, game) evaluation.

use chrono::Utc;

use crate::models::{MatchSnapshot, Side, TipRecord};

use super::draft::DraftState;
use super::filter;
use super::odds::OddsEstimate;
use super::series::SeriesState;

/// Threshold configuration; every value independently overridable per league.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Minimum estimator confidence to tip at all
    pub min_confidence: f64,

    /// Minimum expected value on the better side, in percent
    pub min_expected_value_percent: f64,

    /// Minimum data quality; distinct from prediction confidence even though
    /// a minimal estimator reports one number for both
    pub min_data_quality: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_confidence: 65.0,
            min_expected_value_percent: 5.0,
            min_data_quality: 70.0,
        }
    }
}

/// Why an evaluation produced no tip. Ordinary outcomes, not errors; these
/// are frequent and silent, logged at debug level at most.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Snapshot classified as synthetic/test data
    FilteredOut,
    /// One or both sides below five locked picks
    DraftIncomplete,
    /// The active game already has a recorded result
    GameAlreadyDecided,
    /// Estimator confidence below threshold
    BelowConfidence,
    /// Neither side clears the expected-value bar
    BelowExpectedValue,
    /// Data quality below threshold
    BelowDataQuality,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::FilteredOut => "filtered_out",
            Rejection::DraftIncomplete => "draft_incomplete",
            Rejection::GameAlreadyDecided => "game_already_decided",
            Rejection::BelowConfidence => "below_confidence",
            Rejection::BelowExpectedValue => "below_expected_value",
            Rejection::BelowDataQuality => "below_data_quality",
        }
    }
}

/// Terminal outcome of a single evaluation.
#[derive(Debug, Clone)]
pub enum Evaluation {
    Tip(TipRecord),
    Rejected(Rejection),
}

/// Run the gate sequence. Short-circuits in order; the first failing gate
/// names the rejection.
///
/// The already-decided gate is the safety-critical one: a snapshot whose
/// finished-game count has reached the active game number describes a map
/// that already ended, and tipping it would be a correctness failure with
/// real financial consequence.
pub fn evaluate(
    snapshot: &MatchSnapshot,
    series: &SeriesState,
    draft: &DraftState,
    odds: &OddsEstimate,
    thresholds: &Thresholds,
) -> Evaluation {
    if !filter::is_real(snapshot) {
        return Evaluation::Rejected(Rejection::FilteredOut);
    }

    if !draft.is_complete {
        return Evaluation::Rejected(Rejection::DraftIncomplete);
    }

    if snapshot.finished_games >= series.current_game_number {
        return Evaluation::Rejected(Rejection::GameAlreadyDecided);
    }

    if odds.confidence_score < thresholds.min_confidence {
        return Evaluation::Rejected(Rejection::BelowConfidence);
    }

    let ev_team1 = expected_value_percent(odds.team1_win_probability, odds.team1_odds);
    let ev_team2 = expected_value_percent(odds.team2_win_probability, odds.team2_odds);

    let (recommended_side, best_ev) = if ev_team1 >= ev_team2 {
        (Side::Team1, ev_team1)
    } else {
        (Side::Team2, ev_team2)
    };

    if best_ev < thresholds.min_expected_value_percent {
        return Evaluation::Rejected(Rejection::BelowExpectedValue);
    }

    if odds.confidence_score < thresholds.min_data_quality {
        return Evaluation::Rejected(Rejection::BelowDataQuality);
    }

    Evaluation::Tip(TipRecord {
        id: None,
        match_id: snapshot.match_id.clone(),
        game_number: series.current_game_number,
        league_name: snapshot.league_name.clone(),
        team1_name: snapshot.team1_name.clone(),
        team2_name: snapshot.team2_name.clone(),
        recommended_side,
        expected_value_percent: best_ev,
        confidence_percent: odds.confidence_score,
        is_decider: series.is_decider_game,
        generated_at: Utc::now(),
    })
}

/// EV of backing one side: `(probability * decimal_odds) - 1`, in percent.
fn expected_value_percent(probability: f64, decimal_odds: f64) -> f64 {
    (probability * decimal_odds - 1.0) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlayerSlot, StatDeltas};
    use crate::pipeline::{draft, odds, series};
    use chrono::Utc;

    fn full_side() -> Vec<PlayerSlot> {
        ["Azir", "Sejuani", "Jinx", "Thresh", "Aatrox"]
            .iter()
            .map(|c| PlayerSlot::picked(c))
            .collect()
    }

    fn live_snapshot(gold_diff: i64) -> MatchSnapshot {
        MatchSnapshot {
            match_id: "48291734651".to_string(),
            league_name: "LPL".to_string(),
            team1_name: "JDG".to_string(),
            team2_name: "BLG".to_string(),
            series_wins: (2, 2),
            finished_games: 4,
            team1_slots: full_side(),
            team2_slots: full_side(),
            stats: StatDeltas {
                gold_diff,
                ..Default::default()
            },
            raw_source_tag: "pandascore".to_string(),
            fetched_at: Utc::now(),
        }
    }

    fn run_gates(snapshot: &MatchSnapshot, thresholds: &Thresholds) -> Evaluation {
        let series = series::derive(snapshot.series_wins, 5).unwrap();
        let draft = draft::derive(&snapshot.team1_slots, &snapshot.team2_slots);
        let odds = odds::estimate(&snapshot.stats);
        evaluate(snapshot, &series, &draft, &odds, thresholds)
    }

    #[test]
    fn strong_gold_lead_emits_tip() {
        let snapshot = live_snapshot(3_000);
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Tip(tip) => {
                assert_eq!(tip.recommended_side, Side::Team1);
                assert_eq!(tip.game_number, 5);
                assert!(tip.is_decider);
                assert!(tip.expected_value_percent > 0.0);
                assert!(tip.confidence_percent >= 65.0 && tip.confidence_percent <= 95.0);
            }
            Evaluation::Rejected(reason) => panic!("unexpected rejection: {reason:?}"),
        }
    }

    #[test]
    fn gold_deficit_recommends_team2() {
        let snapshot = live_snapshot(-3_000);
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Tip(tip) => assert_eq!(tip.recommended_side, Side::Team2),
            Evaluation::Rejected(reason) => panic!("unexpected rejection: {reason:?}"),
        }
    }

    #[test]
    fn synthetic_match_is_filtered_out() {
        let mut snapshot = live_snapshot(3_000);
        snapshot.match_id = "test_12345".to_string();
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Rejected(Rejection::FilteredOut) => {}
            other => panic!("expected filter rejection, got {other:?}"),
        }
    }

    #[test]
    fn partial_draft_blocks_tip() {
        let mut snapshot = live_snapshot(3_000);
        snapshot.team2_slots.truncate(3);
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Rejected(Rejection::DraftIncomplete) => {}
            other => panic!("expected draft rejection, got {other:?}"),
        }
    }

    #[test]
    fn finished_map_never_tipped() {
        // Upstream already recorded a winner for the active game
        let mut snapshot = live_snapshot(25_000);
        snapshot.series_wins = (3, 1);
        snapshot.finished_games = 5;
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Rejected(Rejection::GameAlreadyDecided) => {}
            other => panic!("expected already-decided rejection, got {other:?}"),
        }
    }

    #[test]
    fn finished_games_at_current_number_blocks_tip() {
        let mut snapshot = live_snapshot(3_000);
        snapshot.finished_games = 5;
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Rejected(Rejection::GameAlreadyDecided) => {}
            other => panic!("expected already-decided rejection, got {other:?}"),
        }
    }

    #[test]
    fn even_game_fails_expected_value_gate() {
        let snapshot = live_snapshot(0);
        match run_gates(&snapshot, &Thresholds::default()) {
            Evaluation::Rejected(Rejection::BelowExpectedValue) => {}
            other => panic!("expected EV rejection, got {other:?}"),
        }
    }

    #[test]
    fn confidence_gate_applies_before_ev() {
        let snapshot = live_snapshot(3_000);
        let thresholds = Thresholds {
            min_confidence: 80.0,
            ..Default::default()
        };
        match run_gates(&snapshot, &thresholds) {
            Evaluation::Rejected(Rejection::BelowConfidence) => {}
            other => panic!("expected confidence rejection, got {other:?}"),
        }
    }

    #[test]
    fn data_quality_gate_is_independent() {
        let snapshot = live_snapshot(3_000);
        let thresholds = Thresholds {
            min_confidence: 60.0,
            min_data_quality: 85.0,
            ..Default::default()
        };
        match run_gates(&snapshot, &thresholds) {
            Evaluation::Rejected(Rejection::BelowDataQuality) => {}
            other => panic!("expected data-quality rejection, got {other:?}"),
        }
    }
}
