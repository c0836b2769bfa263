//! Pure tip pipeline: filter -> series -> draft -> odds -> eligibility.
//!
//! No I/O, no shared state, no randomness. One [`MatchSnapshot`] in, at most
//! one [`TipRecord`] out. Callers may evaluate different matches concurrently;
//! successive snapshots of the same match must be evaluated in order so an
//! already-decided determination can never regress.

pub mod draft;
pub mod eligibility;
pub mod error;
pub mod filter;
pub mod odds;
pub mod series;

pub use eligibility::{Evaluation, Rejection, Thresholds};
pub use error::PipelineError;

use crate::models::MatchSnapshot;

/// Evaluate one snapshot end to end.
///
/// Gate rejections come back as [`Evaluation::Rejected`]; structural problems
/// (series already decided per the win counts) are errors for the caller to
/// isolate. The synthetic-data filter runs before series derivation so mock
/// records never surface as series errors.
pub fn run(
    snapshot: &MatchSnapshot,
    max_games: u32,
    thresholds: &Thresholds,
) -> Result<Evaluation, PipelineError> {
    if !filter::is_real(snapshot) {
        return Ok(Evaluation::Rejected(Rejection::FilteredOut));
    }

    let series = series::derive(snapshot.series_wins, max_games)?;
    let draft = draft::derive(&snapshot.team1_slots, &snapshot.team2_slots);
    let odds = odds::estimate(&snapshot.stats);

    Ok(eligibility::evaluate(snapshot, &series, &draft, &odds, thresholds))
}
