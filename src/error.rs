//! Error types for Synheart Arousal

use thiserror::Error;

/// Errors that can occur during computation
#[derive(Debug, Error)]
pub enum ComputeError {
    #[error("Invalid filter spec: {0}")]
    InvalidSpec(String),

    #[error("Signal must contain at least one sample")]
    EmptySignal,

    #[error("Invalid sample rate: {0} Hz")]
    InvalidSampleRate(f64),

    #[error("Accumulator window must be at least one sample")]
    InvalidWindow,

    #[error("Paired signals have different sample rates: {0} Hz vs {1} Hz")]
    SampleRateMismatch(f64, f64),

    #[error("Paired sequences have different lengths: {0} vs {1}")]
    LengthMismatch(usize, usize),

    #[error("Insufficient peaks for beat-rate estimation: found {0}, need at least 2")]
    InsufficientPeaks(usize),

    #[error("Degenerate {0} signal: zero batch maximum, normalization undefined")]
    DegenerateSignal(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}
