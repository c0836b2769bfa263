use thiserror::Error;

/// Structural errors raised to the poll loop.
///
/// Threshold-gate rejections are not errors; they are ordinary return values
/// (see [`super::eligibility::Rejection`]). Errors here mean the snapshot
/// itself was unusable; the caller skips the match this cycle and retries on
/// the next poll.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Win counts exceed the series format; no further game exists to tip.
    #[error("invalid series state: {wins_a}-{wins_b} in a best-of-{max_games}")]
    InvalidSeriesState {
        wins_a: u32,
        wins_b: u32,
        max_games: u32,
    },

    /// Required fields missing from the upstream payload. Retry next cycle,
    /// never a permanent rejection.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}
