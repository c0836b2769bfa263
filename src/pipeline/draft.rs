//! Determines whether champion select has finished for the active game.

use crate::models::PlayerSlot;

/// Picks required per side for a complete draft
const PICKS_PER_SIDE: usize = 5;

/// Derived draft progress for the active game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DraftState {
    pub team1_picks_count: usize,
    pub team2_picks_count: usize,

    /// True only when both sides have all five picks locked
    pub is_complete: bool,
}

/// Count locked picks per side. Any side below five makes the whole draft
/// incomplete. No partial credit regardless of elapsed time.
pub fn derive(team1_slots: &[PlayerSlot], team2_slots: &[PlayerSlot]) -> DraftState {
    let team1_picks_count = count_picks(team1_slots);
    let team2_picks_count = count_picks(team2_slots);

    DraftState {
        team1_picks_count,
        team2_picks_count,
        is_complete: team1_picks_count == PICKS_PER_SIDE && team2_picks_count == PICKS_PER_SIDE,
    }
}

fn count_picks(slots: &[PlayerSlot]) -> usize {
    slots.iter().filter(|s| s.has_pick()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn picked(n: usize) -> Vec<PlayerSlot> {
        let mut slots: Vec<PlayerSlot> =
            (0..n).map(|i| PlayerSlot::picked(&format!("champ{i}"))).collect();
        while slots.len() < 5 {
            slots.push(PlayerSlot::empty());
        }
        slots
    }

    #[test]
    fn complete_when_both_sides_full() {
        let state = derive(&picked(5), &picked(5));
        assert_eq!(state.team1_picks_count, 5);
        assert_eq!(state.team2_picks_count, 5);
        assert!(state.is_complete);
    }

    #[test]
    fn incomplete_with_partial_picks() {
        for n in 0..5 {
            assert!(!derive(&picked(n), &picked(5)).is_complete);
            assert!(!derive(&picked(5), &picked(n)).is_complete);
        }
    }

    #[test]
    fn four_of_five_is_incomplete() {
        let state = derive(&picked(5), &picked(4));
        assert_eq!(state.team2_picks_count, 4);
        assert!(!state.is_complete);
    }

    #[test]
    fn blank_champion_name_is_not_a_pick() {
        let mut slots = picked(4);
        slots[4] = PlayerSlot {
            champion: Some("   ".to_string()),
        };
        let state = derive(&slots, &picked(5));
        assert_eq!(state.team1_picks_count, 4);
        assert!(!state.is_complete);
    }

    #[test]
    fn missing_slots_count_as_unpicked() {
        let state = derive(&picked(5)[..3].to_vec(), &picked(5));
        assert_eq!(state.team1_picks_count, 3);
        assert!(!state.is_complete);
    }
}
