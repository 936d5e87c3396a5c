//! Causal IIR bandpass filtering
//!
//! This module designs Butterworth (maximally-flat passband) bandpass filters
//! and applies them as a causal linear difference equation with zero initial
//! state. Causality matters downstream: the transient ripple at the start of
//! a filtered sequence is the caller's to discard or offset.
//!
//! The design path mirrors the classical recipe: analog prototype poles,
//! lowpass-to-bandpass transform, bilinear transform with frequency
//! prewarping, then polynomial expansion into transfer-function form.

use crate::error::ComputeError;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Bilinear transform rate for the Nyquist-normalized design.
const BILINEAR_FS2: f64 = 4.0;

/// Bandpass filter specification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BandpassSpec {
    /// Low cutoff in Hz
    pub low_hz: f64,
    /// High cutoff in Hz
    pub high_hz: f64,
    /// Filter order; the bandpass transform doubles it to `2 * order` poles
    pub order: usize,
}

/// Digital transfer-function coefficients, highest power of `z` first.
///
/// `a[0]` is always 1; both vectors have length `2 * order + 1`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCoefficients {
    /// Numerator (input) coefficients
    pub b: Vec<f64>,
    /// Denominator (output) coefficients
    pub a: Vec<f64>,
}

/// Design a Butterworth bandpass filter for a signal sampled at `fs` Hz.
///
/// Cutoffs are normalized by the Nyquist frequency `fs / 2`; the spec is
/// rejected with [`ComputeError::InvalidSpec`] unless
/// `0 < low < high < fs / 2` and the order is at least 1.
pub fn design(spec: &BandpassSpec, fs: f64) -> Result<FilterCoefficients, ComputeError> {
    if !fs.is_finite() || fs <= 0.0 {
        return Err(ComputeError::InvalidSampleRate(fs));
    }
    let nyquist = 0.5 * fs;
    if spec.order == 0 {
        return Err(ComputeError::InvalidSpec(
            "filter order must be at least 1".to_string(),
        ));
    }
    if spec.low_hz >= spec.high_hz {
        return Err(ComputeError::InvalidSpec(format!(
            "low cutoff {} Hz must be below high cutoff {} Hz",
            spec.low_hz, spec.high_hz
        )));
    }
    if spec.low_hz <= 0.0 || spec.high_hz >= nyquist {
        return Err(ComputeError::InvalidSpec(format!(
            "cutoffs must lie strictly inside (0, {nyquist}) Hz"
        )));
    }

    let order = spec.order;
    let wn_low = spec.low_hz / nyquist;
    let wn_high = spec.high_hz / nyquist;

    // Prewarp the normalized cutoffs onto the analog axis.
    let w1 = BILINEAR_FS2 * (PI * wn_low / 2.0).tan();
    let w2 = BILINEAR_FS2 * (PI * wn_high / 2.0).tan();
    let bw = w2 - w1;
    let w0 = (w1 * w2).sqrt();

    // Analog Butterworth prototype: poles evenly spread on the left half of
    // the unit circle, no finite zeros.
    let n = order as i64;
    let mut prototype = Vec::with_capacity(order);
    let mut m = -n + 1;
    while m < n {
        let theta = PI * m as f64 / (2.0 * n as f64);
        prototype.push(-Complex64::from_polar(1.0, theta));
        m += 2;
    }

    // Lowpass-to-bandpass transform: each prototype pole splits in two, and
    // `order` zeros land at s = 0.
    let mut analog_poles = Vec::with_capacity(2 * order);
    for &p in &prototype {
        let shifted = p * (bw / 2.0);
        let offset = (shifted * shifted - w0 * w0).sqrt();
        analog_poles.push(shifted + offset);
        analog_poles.push(shifted - offset);
    }
    let analog_gain = bw.powi(n as i32);

    // Bilinear transform into the z-plane. The analog zeros at s = 0 map to
    // z = 1; the remaining `order` zeros at infinity map to z = -1.
    let fs2 = Complex64::new(BILINEAR_FS2, 0.0);
    let digital_poles: Vec<Complex64> = analog_poles
        .iter()
        .map(|&p| (fs2 + p) / (fs2 - p))
        .collect();
    let mut digital_zeros = vec![Complex64::new(1.0, 0.0); order];
    digital_zeros.extend(std::iter::repeat(Complex64::new(-1.0, 0.0)).take(order));

    let numerator = Complex64::new(BILINEAR_FS2.powi(n as i32), 0.0);
    let denominator = analog_poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &p| acc * (fs2 - p));
    let digital_gain = analog_gain * (numerator / denominator).re;

    // Expand pole/zero form into polynomial coefficients; conjugate pairs
    // cancel the imaginary parts.
    let b = expand(&digital_zeros)
        .iter()
        .map(|c| c.re * digital_gain)
        .collect();
    let a = expand(&digital_poles).iter().map(|c| c.re).collect();

    Ok(FilterCoefficients { b, a })
}

/// Multiply out `(z - r_0)(z - r_1)...` into descending-power coefficients.
fn expand(roots: &[Complex64]) -> Vec<Complex64> {
    let mut coefficients = vec![Complex64::new(1.0, 0.0)];
    for &root in roots {
        let mut next = vec![Complex64::new(0.0, 0.0); coefficients.len() + 1];
        for (i, &c) in coefficients.iter().enumerate() {
            next[i] += c;
            next[i + 1] -= c * root;
        }
        coefficients = next;
    }
    coefficients
}

/// Apply the filter causally over a sequence.
///
/// Standard direct form II transposed: output `y[n]` depends only on inputs
/// up to `x[n]` and previous outputs. The internal state starts at zero and
/// the output has the same length as the input.
pub fn apply(coefficients: &FilterCoefficients, signal: &[f64]) -> Vec<f64> {
    let n = coefficients.b.len().max(coefficients.a.len());
    if n < 2 {
        let b0 = coefficients.b.first().copied().unwrap_or(0.0);
        return signal.iter().map(|x| b0 * x).collect();
    }

    let mut b = coefficients.b.clone();
    let mut a = coefficients.a.clone();
    b.resize(n, 0.0);
    a.resize(n, 0.0);

    let mut state = vec![0.0; n - 1];
    let mut output = Vec::with_capacity(signal.len());
    for &x in signal {
        let y = b[0] * x + state[0];
        for k in 1..n - 1 {
            state[k - 1] = b[k] * x + state[k] - a[k] * y;
        }
        state[n - 2] = b[n - 1] * x - a[n - 1] * y;
        output.push(y);
    }
    output
}

/// Standardize a sequence to zero mean and unit (population) variance.
///
/// A constant sequence has no spread to normalize by and maps to all zeros
/// rather than propagating non-finite values.
pub fn zscore(signal: &[f64]) -> Vec<f64> {
    if signal.is_empty() {
        return Vec::new();
    }
    let mean = signal.iter().sum::<f64>() / signal.len() as f64;
    let variance = signal.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / signal.len() as f64;
    let std = variance.sqrt();
    if std == 0.0 {
        return vec![0.0; signal.len()];
    }
    signal.iter().map(|x| (x - mean) / std).collect()
}
