pub mod tips;

pub use tips::TipStore;
