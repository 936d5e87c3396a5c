//! Synheart Arousal - On-device arousal scoring engine for EDA and PPG
//!
//! Derives a continuous arousal/stress score from two co-recorded
//! physiological signals through a deterministic batch pipeline: causal
//! bandpass filtering → beat detection and heart-rate estimation (PPG) plus
//! positive-change accumulation (EDA and heart rate) → weighted score fusion.
//!
//! ## Modules
//!
//! - **filter**: Butterworth bandpass design, causal application, z-scoring
//! - **detector**: gradient and peak detection with prominence and spacing
//! - **beats**: inter-beat intervals and dense heart-rate interpolation
//! - **accumulator**: sliding positive-change accumulation (EPC / HRI)
//! - **fusion**: weighted combination of the normalized channels
//! - **pipeline**: batch orchestration over a pair of co-recorded signals
//! - **encoder**: serializable score payload output

pub mod accumulator;
pub mod beats;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod fusion;
pub mod pipeline;
pub mod types;

pub use error::ComputeError;
pub use pipeline::{arousal_scores, ArousalProcessor};
pub use types::{ArousalBatch, EngineConfig, ScoreWeights, Signal};

/// Engine version embedded in all score payloads
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for score payloads
pub const PRODUCER_NAME: &str = "synheart-arousal";
