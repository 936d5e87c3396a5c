//! Beat-interval estimation
//!
//! Converts detected PPG peaks into a dense heart-rate sequence: raw
//! inter-beat intervals, substitution of implausibly long intervals, bpm
//! conversion, and linear interpolation from the sparse peak times onto the
//! full sample grid.

use crate::error::ComputeError;
use crate::types::BeatRecord;

/// Dense heart-rate series derived from a batch of detected beats.
#[derive(Debug, Clone)]
pub struct HeartRateSeries {
    /// Interpolated heart rate, one value per output sample (bpm)
    pub bpm: Vec<f64>,
    /// Per-peak records; the first entry is the zero-interval seed
    pub beats: Vec<BeatRecord>,
    /// Number of intervals replaced by the outlier policy
    pub substituted: usize,
}

/// Estimator turning peak indices into a continuous heart-rate sequence.
#[derive(Debug, Clone, Copy)]
pub struct BeatIntervalEstimator {
    /// Intervals at or above this duration (seconds) are implausible and
    /// replaced by the preceding entry
    max_interval_s: f64,
}

impl BeatIntervalEstimator {
    pub fn new(max_interval_s: f64) -> Self {
        Self { max_interval_s }
    }

    /// Estimate a dense bpm sequence of `output_len` samples at `fs` Hz.
    ///
    /// Peak indices must be strictly increasing, as produced by the
    /// detector. At least two peaks are required; fewer yield
    /// [`ComputeError::InsufficientPeaks`], which callers may downgrade to an
    /// all-zero sequence when a missing pulse channel is acceptable.
    pub fn estimate(
        &self,
        peaks: &[usize],
        fs: f64,
        output_len: usize,
    ) -> Result<HeartRateSeries, ComputeError> {
        if peaks.len() < 2 {
            return Err(ComputeError::InsufficientPeaks(peaks.len()));
        }

        // Seed entry: the first peak has no predecessor, so its interval is
        // an invalid placeholder that maps to 0 bpm.
        let mut intervals = Vec::with_capacity(peaks.len());
        intervals.push(0.0);
        let mut substituted = 0;
        let mut previous = 0.0;
        for pair in peaks.windows(2) {
            let raw = (pair[1] - pair[0]) as f64 / fs;
            let interval = if raw < self.max_interval_s {
                raw
            } else {
                substituted += 1;
                previous
            };
            intervals.push(interval);
            previous = interval;
        }

        let beats: Vec<BeatRecord> = intervals
            .iter()
            .map(|&interval_s| BeatRecord {
                interval_s,
                bpm: if interval_s != 0.0 {
                    60.0 / interval_s
                } else {
                    0.0
                },
            })
            .collect();

        let times: Vec<f64> = peaks.iter().map(|&p| p as f64 / fs).collect();
        let values: Vec<f64> = beats.iter().map(|b| b.bpm).collect();
        let bpm = interpolate_dense(&times, &values, fs, output_len);

        Ok(HeartRateSeries {
            bpm,
            beats,
            substituted,
        })
    }
}

/// Linear interpolation of `(times, values)` onto the grid `k / fs`.
///
/// Outside the known time range the nearest boundary value is held constant;
/// the slope is never extrapolated.
fn interpolate_dense(times: &[f64], values: &[f64], fs: f64, output_len: usize) -> Vec<f64> {
    let last = times.len() - 1;
    let mut segment = 0;
    let mut out = Vec::with_capacity(output_len);
    for k in 0..output_len {
        let t = k as f64 / fs;
        if t <= times[0] {
            out.push(values[0]);
        } else if t >= times[last] {
            out.push(values[last]);
        } else {
            while times[segment + 1] < t {
                segment += 1;
            }
            let span = times[segment + 1] - times[segment];
            let fraction = (t - times[segment]) / span;
            out.push(values[segment] + fraction * (values[segment + 1] - values[segment]));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_too_few_peaks() {
        let estimator = BeatIntervalEstimator::new(1.0);
        assert!(matches!(
            estimator.estimate(&[], 100.0, 100),
            Err(ComputeError::InsufficientPeaks(0))
        ));
        assert!(matches!(
            estimator.estimate(&[42], 100.0, 100),
            Err(ComputeError::InsufficientPeaks(1))
        ));
    }

    #[test]
    fn test_bpm_conversion() {
        let estimator = BeatIntervalEstimator::new(1.0);
        // 80 samples apart at 100 Hz: 0.8 s, 75 bpm.
        let series = estimator.estimate(&[100, 180], 100.0, 300).unwrap();

        assert_eq!(series.beats.len(), 2);
        assert!((series.beats[0].interval_s - 0.0).abs() < 1e-12);
        assert!((series.beats[0].bpm - 0.0).abs() < 1e-12);
        assert!((series.beats[1].interval_s - 0.8).abs() < 1e-12);
        assert!((series.beats[1].bpm - 75.0).abs() < 1e-12);
        assert_eq!(series.substituted, 0);
    }

    #[test]
    fn test_implausible_interval_substituted() {
        let estimator = BeatIntervalEstimator::new(1.0);
        // Intervals: seed, 0.8 s, 1.3 s (implausible), 0.8 s. The 1.3 s gap
        // inherits the previous valid 0.8 s instead of being used raw.
        let series = estimator.estimate(&[0, 80, 210, 290], 100.0, 300).unwrap();

        assert!((series.beats[2].interval_s - 0.8).abs() < 1e-12);
        assert!((series.beats[2].bpm - 75.0).abs() < 1e-12);
        assert!((series.beats[3].interval_s - 0.8).abs() < 1e-12);
        assert_eq!(series.substituted, 1);
    }

    #[test]
    fn test_substitution_can_inherit_seed() {
        let estimator = BeatIntervalEstimator::new(1.0);
        // The only interval is implausible and inherits the zero seed, which
        // maps to 0 bpm rather than a division by zero.
        let series = estimator.estimate(&[0, 150], 100.0, 200).unwrap();

        assert!((series.beats[1].interval_s - 0.0).abs() < 1e-12);
        assert!((series.beats[1].bpm - 0.0).abs() < 1e-12);
        assert_eq!(series.substituted, 1);
        assert!(series.bpm.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_interpolation_and_flat_extrapolation() {
        let estimator = BeatIntervalEstimator::new(1.0);
        let series = estimator.estimate(&[100, 180], 100.0, 300).unwrap();

        // Before the first peak: held at the seed value.
        assert!((series.bpm[0] - 0.0).abs() < 1e-12);
        assert!((series.bpm[99] - 0.0).abs() < 1e-12);
        // Midway between the peaks: linear ramp from 0 to 75.
        assert!((series.bpm[140] - 37.5).abs() < 1e-9);
        // After the last peak: held at the last known value.
        assert!((series.bpm[180] - 75.0).abs() < 1e-12);
        assert!((series.bpm[299] - 75.0).abs() < 1e-12);
    }

    #[test]
    fn test_steady_rhythm_converges() {
        let estimator = BeatIntervalEstimator::new(1.0);
        // 83 samples apart at 100 Hz: 0.83 s, ~72.3 bpm.
        let peaks: Vec<usize> = (0..24).map(|i| i * 83).collect();
        let series = estimator.estimate(&peaks, 100.0, 2000).unwrap();

        for &bpm in &series.bpm[200..1900] {
            assert!((bpm - 72.29).abs() < 0.1, "bpm {bpm} off steady rhythm");
        }
    }
}
