//! Core types for the Synheart Arousal pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: sampled signals, engine configuration, per-beat records, the
//! processed batch, and the serializable output payload.

use crate::error::ComputeError;
use crate::filter::BandpassSpec;
use serde::{Deserialize, Serialize};

/// A uniformly sampled, single-channel signal.
///
/// Samples are spaced exactly `1/sample_rate_hz` seconds apart. The constructor
/// rejects empty sequences and non-positive sample rates; every downstream
/// stage relies on those invariants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    samples: Vec<f64>,
    sample_rate_hz: f64,
}

impl Signal {
    /// Create a signal from raw samples and a sampling rate (Hz).
    pub fn new(samples: Vec<f64>, sample_rate_hz: f64) -> Result<Self, ComputeError> {
        if samples.is_empty() {
            return Err(ComputeError::EmptySignal);
        }
        if !sample_rate_hz.is_finite() || sample_rate_hz <= 0.0 {
            return Err(ComputeError::InvalidSampleRate(sample_rate_hz));
        }
        Ok(Self {
            samples,
            sample_rate_hz,
        })
    }

    /// Raw sample values.
    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sampling rate in Hz.
    pub fn sample_rate_hz(&self) -> f64 {
        self.sample_rate_hz
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the signal holds no samples (never, post-construction).
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Total duration covered by the samples, in seconds.
    pub fn duration_s(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate_hz
    }
}

/// One detected cardiac cycle: the inter-beat interval and its instantaneous
/// rate. The first record of a batch is seeded with a zero interval and zero
/// bpm and is treated as an invalid placeholder, never as a real beat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeatRecord {
    /// Inter-beat interval in seconds (0 = invalid placeholder)
    pub interval_s: f64,
    /// Instantaneous heart rate in beats per minute (0 when interval is 0)
    pub bpm: f64,
}

/// Fixed weights applied to the two normalized accumulator channels.
///
/// The fused score ranges from zero to `pulse + epc` for non-degenerate input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Weight of the heart-rate increase channel (HRI)
    pub pulse: f64,
    /// Weight of the EDA positive-change channel (EPC)
    pub epc: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        // 30% pulse / 70% EDA weighting
        Self {
            pulse: 1.5,
            epc: 3.5,
        }
    }
}

impl ScoreWeights {
    /// Upper bound of the fused score under non-degenerate input.
    pub fn max_score(&self) -> f64 {
        self.pulse + self.epc
    }
}

/// Full parameterization of the scoring engine.
///
/// Every constant the pipeline depends on is carried here explicitly and
/// threaded through the components; no stage reads ambient configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Bandpass applied to the EDA channel before accumulation
    pub eda_band: BandpassSpec,
    /// Bandpass applied to the PPG channel before beat detection
    pub ppg_band: BandpassSpec,
    /// Minimum spacing between detected beats, in seconds
    pub min_beat_spacing_s: f64,
    /// Minimum prominence of a beat peak in the PPG gradient signal
    pub min_prominence: f64,
    /// Inter-beat intervals at or above this duration are treated as
    /// implausible and replaced by the preceding valid interval
    pub max_interval_s: f64,
    /// Trailing window of the EDA positive-change accumulator, in seconds
    pub epc_window_s: f64,
    /// Trailing window of the heart-rate increase accumulator, in seconds
    pub hri_window_s: f64,
    /// Channel weights for score fusion
    pub weights: ScoreWeights,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            eda_band: BandpassSpec {
                low_hz: 1e-9,
                high_hz: 1.5,
                order: 3,
            },
            ppg_band: BandpassSpec {
                low_hz: 1e-9,
                high_hz: 2.5,
                order: 3,
            },
            // 0.28 s is the shortest plausible cardiac cycle (~170 bpm)
            min_beat_spacing_s: 0.28,
            min_prominence: 0.1,
            max_interval_s: 1.0,
            epc_window_s: 10.0,
            hri_window_s: 5.0,
            weights: ScoreWeights::default(),
        }
    }
}

/// Quality flag describing a caveat of a processed batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    /// One or more implausible inter-beat intervals were replaced by the
    /// preceding valid interval
    SubstitutedIntervals,
    /// Fewer than one beat per two seconds of signal was detected; the heart
    /// rate sequence is dominated by interpolation
    SparseBeats,
}

/// Result of one batch run over a pair of co-recorded signals.
///
/// All sequences are sample-aligned with the input and share its sampling
/// rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArousalBatch {
    /// Fused arousal score, one value per input sample
    pub scores: Vec<f64>,
    /// Dense heart-rate sequence interpolated from detected beats (bpm)
    pub heart_rate_bpm: Vec<f64>,
    /// Sliding-window sum of positive EDA increments (EPC)
    pub epc: Vec<f64>,
    /// Sliding-window sum of positive heart-rate increments (HRI)
    pub hri: Vec<f64>,
    /// Per-beat interval records, seeded entry first
    pub beats: Vec<BeatRecord>,
    /// Number of intervals replaced by the outlier policy
    pub substituted_intervals: usize,
    /// Sampling rate shared by all sequences (Hz)
    pub sample_rate_hz: f64,
    /// Caveats observed while processing
    pub quality_flags: Vec<QualityFlag>,
}

/// Producer metadata embedded in every payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Provenance of a score payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreProvenance {
    pub sample_rate_hz: f64,
    pub samples: usize,
    pub computed_at_utc: String,
}

/// Quality metrics of a score payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreQuality {
    /// Number of detected beats contributing to the heart-rate sequence
    pub beat_count: usize,
    /// Number of inter-beat intervals replaced by the outlier policy
    pub substituted_intervals: usize,
    /// Quality flags
    pub flags: Vec<String>,
}

/// Score series carried by a payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSeries {
    /// Fused arousal score per sample
    pub scores: Vec<f64>,
    /// Dense heart-rate sequence per sample (bpm)
    pub heart_rate_bpm: Vec<f64>,
}

/// Complete arousal score payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArousalPayload {
    pub asi_version: String,
    pub producer: ScoreProducer,
    pub provenance: ScoreProvenance,
    pub quality: ScoreQuality,
    pub series: ScoreSeries,
}
