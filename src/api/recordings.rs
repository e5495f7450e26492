use crate::api::{ApiClient, ApiError};
use crate::models::{CallRecording, RecordingSearchParams, SignedStreamUrl};

/// Search recordings with optional filters
pub async fn search_recordings(
    client: &ApiClient,
    params: &RecordingSearchParams,
) -> Result<Vec<CallRecording>, ApiError> {
    // Build query string from params
    let mut query_params = Vec::new();

    if let Some(agent_id) = params.agent_id {
        query_params.push(format!("agentId={}", agent_id));
    }
    if let Some(campaign_id) = params.campaign_id {
        query_params.push(format!("campaignId={}", campaign_id));
    }
    if let Some(start_date) = params.start_date {
        query_params.push(format!("startDate={}", start_date.to_rfc3339()));
    }
    if let Some(end_date) = params.end_date {
        query_params.push(format!("endDate={}", end_date.to_rfc3339()));
    }
    if let Some(limit) = params.limit {
        query_params.push(format!("limit={}", limit));
    }
    if let Some(offset) = params.offset {
        query_params.push(format!("offset={}", offset));
    }

    let query_string = if query_params.is_empty() {
        String::new()
    } else {
        format!("?{}", query_params.join("&"))
    };

    client
        .get(&format!("/api/recordings{}", query_string))
        .await
}

/// Get recording details by ID
pub async fn get_recording(client: &ApiClient, id: i64) -> Result<CallRecording, ApiError> {
    client.get(&format!("/api/recordings/{}", id)).await
}

/// Resolve a recording ID into a short-lived signed stream URL.
///
/// This is the resolver handed to `PlaybackCoordinator::play`; a recording
/// whose media is gone surfaces as `ApiError::NotFound`.
pub async fn get_stream_url(client: &ApiClient, id: i64) -> Result<SignedStreamUrl, ApiError> {
    client
        .get(&format!("/api/recordings/{}/stream-url", id))
        .await
}
