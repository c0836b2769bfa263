pub mod match_poller;
pub mod tip_processor;

pub use match_poller::MatchPollerWorker;
pub use tip_processor::TipProcessorWorker;
