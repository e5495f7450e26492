use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecording {
    pub id: i64,
    #[serde(rename = "callId")]
    pub call_id: i64,
    #[serde(rename = "durationSeconds")]
    pub duration_seconds: i32,
    pub format: String,
    #[serde(rename = "uploadedAt")]
    pub uploaded_at: DateTime<Utc>,
    pub metadata: Option<serde_json::Value>,
}

impl CallRecording {
    /// Denormalized display fields, when the server attached them.
    pub fn display_metadata(&self) -> Option<RecordingMetadata> {
        self.metadata
            .as_ref()
            .and_then(|m| serde_json::from_value(m.clone()).ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordingMetadata {
    #[serde(rename = "agentName")]
    pub agent_name: Option<String>,
    #[serde(rename = "leadName")]
    pub lead_name: Option<String>,
    #[serde(rename = "campaignName")]
    pub campaign_name: Option<String>,
    pub disposition: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordingSearchParams {
    #[serde(rename = "agentId")]
    pub agent_id: Option<i64>,
    #[serde(rename = "campaignId")]
    pub campaign_id: Option<i64>,
    #[serde(rename = "startDate")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate")]
    pub end_date: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A short-lived signed URL for streaming one recording.
///
/// The server guarantees the URL is usable at least long enough to start
/// playback; nothing here assumes it outlives `expires_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedStreamUrl {
    pub url: String,
    #[serde(rename = "expiresAt")]
    pub expires_at: DateTime<Utc>,
}
