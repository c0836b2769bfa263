pub mod pandascore;

pub use pandascore::PandaScoreClient;
