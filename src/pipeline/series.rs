//! Derives which game of a best-of-N series is currently active.

use super::error::PipelineError;

/// Derived series position; never stored independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesState {
    /// 1-based index of the game currently being played
    pub current_game_number: u32,

    /// True when one more win clinches the series for either side
    pub is_decider_game: bool,
}

/// Derive the active game from series win counts.
///
/// Fails when the series is already decided (`wins_a + wins_b >= max_games`);
/// there is no further game to tip. `max_games` comes from per-league
/// configuration; qualifier stages run best-of-1 and best-of-3.
pub fn derive(series_wins: (u32, u32), max_games: u32) -> Result<SeriesState, PipelineError> {
    let (wins_a, wins_b) = series_wins;

    // Win counts come straight from the payload; sum in u64 so corrupt
    // values cannot overflow past the validity check
    let played = wins_a as u64 + wins_b as u64;

    if max_games == 0 || played >= max_games as u64 {
        return Err(PipelineError::InvalidSeriesState {
            wins_a,
            wins_b,
            max_games,
        });
    }

    let played = played as u32;

    Ok(SeriesState {
        current_game_number: played + 1,
        is_decider_game: played == max_games - 1,
    })
}
