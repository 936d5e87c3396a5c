//! Score payload encoding
//!
//! This module encodes a processed batch into a serializable payload for
//! downstream consumers, stamped with producer, provenance, and quality
//! metadata.

use crate::error::ComputeError;
use crate::types::{
    ArousalBatch, ArousalPayload, ScoreProducer, ScoreProvenance, ScoreQuality, ScoreSeries,
};
use crate::{ENGINE_VERSION, PRODUCER_NAME};
use chrono::Utc;
use uuid::Uuid;

/// Current arousal score interchange schema version
pub const ASI_VERSION: &str = "1.0.0";

/// Encoder producing score payloads
pub struct ScoreEncoder {
    instance_id: String,
}

impl Default for ScoreEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Encode a processed batch into a payload
    pub fn encode(&self, batch: &ArousalBatch) -> ArousalPayload {
        let computed_at = Utc::now();

        let producer = ScoreProducer {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            instance_id: self.instance_id.clone(),
        };

        let provenance = ScoreProvenance {
            sample_rate_hz: batch.sample_rate_hz,
            samples: batch.scores.len(),
            computed_at_utc: computed_at.to_rfc3339(),
        };

        let quality = ScoreQuality {
            beat_count: batch.beats.len(),
            substituted_intervals: batch.substituted_intervals,
            flags: batch
                .quality_flags
                .iter()
                .map(|f| format!("{f:?}").to_lowercase())
                .collect(),
        };

        ArousalPayload {
            asi_version: ASI_VERSION.to_string(),
            producer,
            provenance,
            quality,
            series: ScoreSeries {
                scores: batch.scores.clone(),
                heart_rate_bpm: batch.heart_rate_bpm.clone(),
            },
        }
    }

    /// Encode to JSON string
    pub fn encode_to_json(&self, batch: &ArousalBatch) -> Result<String, ComputeError> {
        serde_json::to_string_pretty(&self.encode(batch)).map_err(ComputeError::JsonError)
    }
}
