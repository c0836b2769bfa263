pub mod snapshot;
pub mod tip;

pub use snapshot::{MatchSnapshot, PlayerSlot, StatDeltas};
pub use tip::{Side, TipRecord};
