//! Score fusion
//!
//! Combines the two accumulator channels into the final arousal score. Each
//! channel is normalized by its own maximum over the full batch, scaled by a
//! fixed weight, and summed elementwise. The batch-global normalization is
//! not causal; a streaming adaptation would swap in a running maximum or a
//! pre-calibrated constant here.

use crate::error::ComputeError;
use crate::types::ScoreWeights;

/// Fuse the EPC and HRI sequences into one score per sample.
///
/// Both sequences must be sample-aligned; a zero batch maximum on either
/// channel makes normalization undefined and is rejected as
/// [`ComputeError::DegenerateSignal`]. For valid input every score lies in
/// `[0, weights.pulse + weights.epc]`.
pub fn combine(
    epc: &[f64],
    hri: &[f64],
    weights: &ScoreWeights,
) -> Result<Vec<f64>, ComputeError> {
    if epc.len() != hri.len() {
        return Err(ComputeError::LengthMismatch(epc.len(), hri.len()));
    }
    if epc.is_empty() {
        return Err(ComputeError::EmptySignal);
    }

    let epc_max = batch_max(epc);
    if epc_max <= 0.0 {
        return Err(ComputeError::DegenerateSignal("EPC".to_string()));
    }
    let hri_max = batch_max(hri);
    if hri_max <= 0.0 {
        return Err(ComputeError::DegenerateSignal("HRI".to_string()));
    }

    Ok(epc
        .iter()
        .zip(hri)
        .map(|(&e, &h)| h / hri_max * weights.pulse + e / epc_max * weights.epc)
        .collect())
}

fn batch_max(sequence: &[f64]) -> f64 {
    sequence.iter().fold(f64::NEG_INFINITY, |acc, &x| acc.max(x))
}
