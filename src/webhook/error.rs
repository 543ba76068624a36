use axum::http::StatusCode;
use thiserror::Error;

/// Every way a webhook delivery can be rejected.
#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Missing signature or API key")]
    MissingHeaders,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid JSON")]
    InvalidJson,

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Missing meetingId")]
    MissingMeetingId,

    #[error("Meeting not found")]
    MeetingNotFound,

    #[error("Agent not found")]
    AgentNotFound,

    #[error("Agent failed to start")]
    AgentStartFailed(#[source] anyhow::Error),

    #[error("Failed to end call")]
    CallEndFailed(#[source] anyhow::Error),

    #[error("Internal server error")]
    Database(#[from] anyhow::Error),
}

impl WebhookError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingHeaders
            | Self::InvalidJson
            | Self::InvalidPayload(_)
            | Self::MissingMeetingId => StatusCode::BAD_REQUEST,
            Self::InvalidSignature => StatusCode::UNAUTHORIZED,
            Self::MeetingNotFound | Self::AgentNotFound => StatusCode::NOT_FOUND,
            Self::AgentStartFailed(_) | Self::CallEndFailed(_) | Self::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
