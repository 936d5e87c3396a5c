//! Pipeline orchestration
//!
//! This module provides the public API for Synheart Arousal. It runs the
//! full batch pipeline over a pair of co-recorded signals:
//!
//! 1. Causal bandpass filtering and z-scoring of each channel
//! 2. EDA branch: sliding positive-change accumulation (EPC)
//! 3. PPG branch: gradient, beat detection, interval estimation, dense
//!    heart rate, sliding positive-change accumulation (HRI)
//! 4. Weighted fusion of the normalized channels into the score sequence
//!
//! The branches are independent until fusion and share no mutable state.

use crate::accumulator::PositiveChangeAccumulator;
use crate::beats::{BeatIntervalEstimator, HeartRateSeries};
use crate::detector;
use crate::encoder::ScoreEncoder;
use crate::error::ComputeError;
use crate::filter;
use crate::fusion;
use crate::types::{ArousalBatch, EngineConfig, QualityFlag, Signal};

/// Run the default pipeline over a pair of co-recorded signals and return
/// the fused score sequence, one value per input sample.
pub fn arousal_scores(eda: &Signal, ppg: &Signal) -> Result<Vec<f64>, ComputeError> {
    ArousalProcessor::new()
        .process(eda, ppg)
        .map(|batch| batch.scores)
}

/// Batch processor for deriving arousal scores from EDA and PPG.
///
/// Stateless between runs; configuration is fixed at construction and
/// threaded explicitly through every stage.
pub struct ArousalProcessor {
    config: EngineConfig,
}

impl Default for ArousalProcessor {
    fn default() -> Self {
        Self::new()
    }
}

impl ArousalProcessor {
    /// Create a processor with the default configuration.
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    /// Create a processor with a specific configuration.
    pub fn with_config(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Process one batch of co-recorded EDA and PPG.
    ///
    /// The signals must share their sampling rate and length; the error
    /// names the first violated invariant otherwise.
    pub fn process(&self, eda: &Signal, ppg: &Signal) -> Result<ArousalBatch, ComputeError> {
        let fs = eda.sample_rate_hz();
        if fs != ppg.sample_rate_hz() {
            return Err(ComputeError::SampleRateMismatch(fs, ppg.sample_rate_hz()));
        }
        if eda.len() != ppg.len() {
            return Err(ComputeError::LengthMismatch(eda.len(), ppg.len()));
        }

        let epc = self.eda_branch(eda.samples(), fs)?;
        let (heart_rate, hri) = self.ppg_branch(ppg.samples(), fs)?;
        let scores = fusion::combine(&epc, &hri, &self.config.weights)?;

        let mut quality_flags = Vec::new();
        if heart_rate.substituted > 0 {
            quality_flags.push(QualityFlag::SubstitutedIntervals);
        }
        if (heart_rate.beats.len() as f64) < ppg.duration_s() / 2.0 {
            quality_flags.push(QualityFlag::SparseBeats);
        }

        Ok(ArousalBatch {
            scores,
            heart_rate_bpm: heart_rate.bpm,
            epc,
            hri,
            beats: heart_rate.beats,
            substituted_intervals: heart_rate.substituted,
            sample_rate_hz: fs,
            quality_flags,
        })
    }

    /// Process a batch and encode the result as a score payload JSON.
    pub fn process_to_json(&self, eda: &Signal, ppg: &Signal) -> Result<String, ComputeError> {
        let batch = self.process(eda, ppg)?;
        ScoreEncoder::new().encode_to_json(&batch)
    }

    fn eda_branch(&self, samples: &[f64], fs: f64) -> Result<Vec<f64>, ComputeError> {
        let coefficients = filter::design(&self.config.eda_band, fs)?;
        let filtered = filter::apply(&coefficients, samples);
        let standardized = filter::zscore(&filtered);

        let window = (self.config.epc_window_s * fs) as usize;
        Ok(PositiveChangeAccumulator::new(window)?.run(&standardized))
    }

    fn ppg_branch(&self, samples: &[f64], fs: f64) -> Result<(HeartRateSeries, Vec<f64>), ComputeError> {
        let coefficients = filter::design(&self.config.ppg_band, fs)?;
        let filtered = filter::apply(&coefficients, samples);
        let standardized = filter::zscore(&filtered);
        let slope = detector::gradient(&standardized);

        let min_distance = (self.config.min_beat_spacing_s * fs).ceil() as usize;
        let peaks = detector::find_peaks(&slope, min_distance, self.config.min_prominence);

        let heart_rate = BeatIntervalEstimator::new(self.config.max_interval_s).estimate(
            &peaks,
            fs,
            samples.len(),
        )?;

        let window = (self.config.hri_window_s * fs) as usize;
        let hri = PositiveChangeAccumulator::new(window)?.run(&heart_rate.bpm);
        Ok((heart_rate, hri))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    const FS: f64 = 100.0;

    /// 20 s of clean 1.2 Hz pulse: a 72 bpm rhythm.
    fn synthetic_ppg() -> Signal {
        let samples: Vec<f64> = (0..2000)
            .map(|i| (2.0 * PI * 1.2 * i as f64 / FS).sin())
            .collect();
        Signal::new(samples, FS).unwrap()
    }

    /// Slow conductance drift with a faster ripple on top.
    fn synthetic_eda() -> Signal {
        let samples: Vec<f64> = (0..2000)
            .map(|i| {
                let t = i as f64 / FS;
                (2.0 * PI * 0.05 * t).sin() + 0.3 * (2.0 * PI * 0.3 * t).sin()
            })
            .collect();
        Signal::new(samples, FS).unwrap()
    }

    #[test]
    fn test_mismatched_sample_rates_rejected() {
        let eda = Signal::new(vec![0.0; 100], 100.0).unwrap();
        let ppg = Signal::new(vec![0.0; 100], 64.0).unwrap();
        assert!(matches!(
            ArousalProcessor::new().process(&eda, &ppg),
            Err(ComputeError::SampleRateMismatch(_, _))
        ));
    }

    #[test]
    fn test_mismatched_lengths_rejected() {
        let eda = Signal::new(vec![0.0; 100], 100.0).unwrap();
        let ppg = Signal::new(vec![0.0; 101], 100.0).unwrap();
        assert!(matches!(
            ArousalProcessor::new().process(&eda, &ppg),
            Err(ComputeError::LengthMismatch(100, 101))
        ));
    }

    #[test]
    fn test_flatline_ppg_yields_insufficient_peaks() {
        let eda = synthetic_eda();
        let ppg = Signal::new(vec![0.0; 2000], FS).unwrap();
        assert!(matches!(
            ArousalProcessor::new().process(&eda, &ppg),
            Err(ComputeError::InsufficientPeaks(_))
        ));
    }

    #[test]
    fn test_end_to_end_scores() {
        let processor = ArousalProcessor::new();
        let batch = processor.process(&synthetic_eda(), &synthetic_ppg()).unwrap();

        assert_eq!(batch.scores.len(), 2000);
        assert_eq!(batch.heart_rate_bpm.len(), 2000);
        assert_eq!(batch.epc.len(), 2000);
        assert_eq!(batch.hri.len(), 2000);
        assert!((batch.sample_rate_hz - FS).abs() < 1e-12);

        // The rolling sums may carry a hair of negative floating-point
        // residue, so the lower bound gets the same tolerance as the upper.
        let bound = processor.config().weights.max_score();
        for &score in &batch.scores {
            assert!(
                score >= -1e-9 && score <= bound + 1e-9,
                "score {score} out of bound"
            );
        }
    }

    #[test]
    fn test_steady_pulse_converges_to_72_bpm() {
        let batch = ArousalProcessor::new()
            .process(&synthetic_eda(), &synthetic_ppg())
            .unwrap();

        // A 1.2 Hz pulse should yield roughly one beat per 0.833 s.
        assert!(
            (21..=27).contains(&batch.beats.len()),
            "unexpected beat count {}",
            batch.beats.len()
        );

        // Away from the filter transient and the interpolation ramp-in, the
        // heart rate settles at 72 bpm give or take the sample quantization.
        for &bpm in &batch.heart_rate_bpm[1000..1900] {
            assert!((bpm - 72.0).abs() <= 1.0, "bpm {bpm} did not converge");
        }
    }

    #[test]
    fn test_arousal_scores_convenience() {
        let scores = arousal_scores(&synthetic_eda(), &synthetic_ppg()).unwrap();
        assert_eq!(scores.len(), 2000);
    }

    #[test]
    fn test_process_to_json() {
        let json = ArousalProcessor::new()
            .process_to_json(&synthetic_eda(), &synthetic_ppg())
            .unwrap();
        let payload: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(payload["producer"]["name"], "synheart-arousal");
        assert_eq!(payload["provenance"]["samples"], 2000);
        assert!(payload["series"]["scores"].as_array().unwrap().len() == 2000);
    }
}
