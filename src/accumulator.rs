//! Sliding positive-change accumulation
//!
//! Generic rolling-window stage shared by the EDA and heart-rate branches:
//! for each sample, the sum of positive sample-to-sample increases within a
//! trailing window of fixed length. The incremental update makes the whole
//! pass O(n) instead of O(n * window).

use crate::error::ComputeError;

/// Rolling sum of positive increments over a trailing window.
#[derive(Debug, Clone, Copy)]
pub struct PositiveChangeAccumulator {
    window: usize,
}

impl PositiveChangeAccumulator {
    /// Create an accumulator with a window of `window` samples (at least 1).
    pub fn new(window: usize) -> Result<Self, ComputeError> {
        if window == 0 {
            return Err(ComputeError::InvalidWindow);
        }
        Ok(Self { window })
    }

    /// Window length in samples.
    pub fn window(&self) -> usize {
        self.window
    }

    /// Accumulate over a full sequence.
    ///
    /// Output matches the input in length. Indices before the window has
    /// filled are an explicit buffering period and stay zero; the first real
    /// output at `window - 1` is a direct sum, and every later index is the
    /// O(1) update `out[i - 1] - inc[i - window] + inc[i]`.
    pub fn run(&self, signal: &[f64]) -> Vec<f64> {
        let increments = positive_increments(signal);
        let w = self.window;
        let mut out = vec![0.0; signal.len()];
        if signal.len() < w {
            return out;
        }

        out[w - 1] = increments[..w].iter().sum();
        for i in w..increments.len() {
            out[i] = out[i - 1] - increments[i - w] + increments[i];
        }
        out
    }
}

/// Positive sample-to-sample increases; decreases and the first sample
/// contribute zero.
pub fn positive_increments(signal: &[f64]) -> Vec<f64> {
    let mut increments = vec![0.0; signal.len()];
    for i in 1..signal.len() {
        let delta = signal[i] - signal[i - 1];
        if delta > 0.0 {
            increments[i] = delta;
        }
    }
    increments
}
