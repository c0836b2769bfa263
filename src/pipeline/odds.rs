//! Win-probability and market-odds estimation from in-game stat deltas.
//!
//! Used when no real bookmaker feed is wired up. The model probability is a
//! bounded logistic over a linear blend of objective, gold, and kill
//! differentials. The quoted odds are derived from a dampened copy of the same
//! advantage scalar: live markets underreact to in-game swings, and that lag
//! is exactly where the expected value comes from. Fully deterministic:
//! identical deltas always produce identical estimates.

use crate::models::StatDeltas;

/// Objective composite weights: towers + 2*dragons + 3*barons
const DRAGON_WEIGHT: f64 = 2.0;
const BARON_WEIGHT: f64 = 3.0;

/// Linear blend weights for the raw advantage scalar
const OBJECTIVE_WEIGHT: f64 = 0.4;
const GOLD_WEIGHT: f64 = 0.000_35;
const KILL_WEIGHT: f64 = 0.05;

/// Logistic steepness
const STEEPNESS: f64 = 0.35;

/// Probability bounds; extreme inputs never saturate to 0% or 100%
const PROB_FLOOR: f64 = 0.05;
const PROB_CEIL: f64 = 0.95;
const PROB_MARGIN: f64 = 1e-6;

/// How much of the live swing the market is assumed to have priced in
const MARKET_LAG: f64 = 0.5;

/// Confidence baseline and per-signal bonus
const BASE_CONFIDENCE: f64 = 70.0;
const SIGNAL_BONUS: f64 = 5.0;
const MAX_CONFIDENCE: f64 = 95.0;

/// Estimated probabilities and odds for one game.
#[derive(Debug, Clone, PartialEq)]
pub struct OddsEstimate {
    /// Model win probabilities; always sum to 1.0, each in (0.05, 0.95)
    pub team1_win_probability: f64,
    pub team2_win_probability: f64,

    /// Decimal odds off the lagged market probability, each >= 1.0
    pub team1_odds: f64,
    pub team2_odds: f64,

    /// True on this path; a bookmaker-sourced estimate would clear it
    pub is_estimated: bool,

    /// Data-completeness confidence, 0-100; capped below 100
    pub confidence_score: f64,
}

/// Estimate win probabilities and market odds from stat differentials.
pub fn estimate(deltas: &StatDeltas) -> OddsEstimate {
    let raw = advantage_scalar(deltas);

    let team1_win_probability = squash(raw);
    let team2_win_probability = 1.0 - team1_win_probability;

    let market_team1 = squash(MARKET_LAG * raw);

    OddsEstimate {
        team1_win_probability,
        team2_win_probability,
        team1_odds: 1.0 / market_team1,
        team2_odds: 1.0 / (1.0 - market_team1),
        is_estimated: true,
        confidence_score: confidence(deltas),
    }
}

/// Linear blend of the objective composite, gold, and kill differentials.
fn advantage_scalar(deltas: &StatDeltas) -> f64 {
    let objective_diff = deltas.tower_diff as f64
        + DRAGON_WEIGHT * deltas.dragon_diff as f64
        + BARON_WEIGHT * deltas.baron_diff as f64;

    OBJECTIVE_WEIGHT * objective_diff
        + GOLD_WEIGHT * deltas.gold_diff as f64
        + KILL_WEIGHT * deltas.kill_diff as f64
}

/// Logistic squashed into the open interval (0.05, 0.95).
fn squash(raw: f64) -> f64 {
    let sigmoid = 1.0 / (1.0 + (-STEEPNESS * raw).exp());
    let p = PROB_FLOOR + (PROB_CEIL - PROB_FLOOR) * sigmoid;

    // exp() underflows on huge inputs; keep the interval open
    p.clamp(PROB_FLOOR + PROB_MARGIN, PROB_CEIL - PROB_MARGIN)
}

/// Confidence from data completeness: baseline 70, +5 per corroborating
/// signal present, capped at 95. Never 100, estimates stay uncertain.
fn confidence(deltas: &StatDeltas) -> f64 {
    let mut score = BASE_CONFIDENCE;

    if deltas.cs_diff.is_some() {
        score += SIGNAL_BONUS;
    }
    if deltas.vision_diff.is_some() {
        score += SIGNAL_BONUS;
    }
    if deltas.first_blood.is_some() {
        score += SIGNAL_BONUS;
    }
    if deltas.first_tower.is_some() {
        score += SIGNAL_BONUS;
    }

    score.min(MAX_CONFIDENCE)
}
