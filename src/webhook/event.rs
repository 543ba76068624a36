//! Webhook payloads sent by the video provider.
//!
//! Only the fields the handler reads are modelled. Every field is lenient: a
//! missing or wrongly typed value reads as `None`, so unrelated payload
//! changes never reject a delivery and a bad id surfaces as a specific 400.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use super::WebhookError;
use crate::video::CallRef;

pub mod event_types {
    pub const SESSION_STARTED: &str = "call.session_started";
    pub const PARTICIPANT_LEFT: &str = "call.session_participant_left";
    pub const SESSION_ENDED: &str = "call.session_ended";
    pub const TRANSCRIPTION_READY: &str = "call.transcription_ready";
    pub const RECORDING_READY: &str = "call.recording_ready";
}

/// Reads any JSON value, keeping it only if it deserializes as `T`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Debug, Default, Deserialize)]
pub struct CallCustom {
    #[serde(rename = "meetingId", default, deserialize_with = "lenient")]
    pub meeting_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CallPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub custom: Option<CallCustom>,
}

/// `call.session_started` / `call.session_ended`.
#[derive(Debug, Default, Deserialize)]
pub struct CallSessionEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub call: Option<CallPayload>,
}

impl CallSessionEvent {
    /// Meeting id stored in the call's custom data when the call was created.
    pub fn meeting_id(&self) -> Option<&str> {
        self.call
            .as_ref()?
            .custom
            .as_ref()?
            .meeting_id
            .as_deref()
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ParticipantPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub user: Option<UserPayload>,
}

/// `call.session_participant_left`.
#[derive(Debug, Default, Deserialize)]
pub struct ParticipantLeftEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub call_cid: Option<String>,
    /// Only used for logging.
    #[serde(default, deserialize_with = "lenient")]
    pub participant: Option<ParticipantPayload>,
}

impl ParticipantLeftEvent {
    pub fn call(&self) -> Option<CallRef> {
        CallRef::parse_cid(self.call_cid.as_deref()?)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.participant.as_ref()?.user.as_ref()?.id.as_deref()
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AssetPayload {
    #[serde(default, deserialize_with = "lenient")]
    pub url: Option<String>,
}

/// `call.transcription_ready` / `call.recording_ready`.
#[derive(Debug, Default, Deserialize)]
pub struct AssetReadyEvent {
    #[serde(default, deserialize_with = "lenient")]
    pub call_cid: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub call_transcription: Option<AssetPayload>,
    #[serde(default, deserialize_with = "lenient")]
    pub call_recording: Option<AssetPayload>,
}

impl AssetReadyEvent {
    pub fn call(&self) -> Option<CallRef> {
        CallRef::parse_cid(self.call_cid.as_deref()?)
    }

    pub fn transcription_url(&self) -> Option<&str> {
        self.call_transcription.as_ref()?.url.as_deref()
    }

    pub fn recording_url(&self) -> Option<&str> {
        self.call_recording.as_ref()?.url.as_deref()
    }
}

#[derive(Debug)]
pub enum WebhookEvent {
    SessionStarted(CallSessionEvent),
    ParticipantLeft(ParticipantLeftEvent),
    SessionEnded(CallSessionEvent),
    TranscriptionReady(AssetReadyEvent),
    RecordingReady(AssetReadyEvent),
    /// Any other event type, acknowledged without action.
    Unhandled(String),
}

impl WebhookEvent {
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        let payload: Value = serde_json::from_slice(body).map_err(|_| WebhookError::InvalidJson)?;

        let event_type = payload
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let event = match event_type.as_str() {
            event_types::SESSION_STARTED => Self::SessionStarted(from_payload(payload)?),
            event_types::PARTICIPANT_LEFT => Self::ParticipantLeft(from_payload(payload)?),
            event_types::SESSION_ENDED => Self::SessionEnded(from_payload(payload)?),
            event_types::TRANSCRIPTION_READY => Self::TranscriptionReady(from_payload(payload)?),
            event_types::RECORDING_READY => Self::RecordingReady(from_payload(payload)?),
            _ => Self::Unhandled(event_type),
        };

        Ok(event)
    }

    pub fn event_type(&self) -> &str {
        match self {
            Self::SessionStarted(_) => event_types::SESSION_STARTED,
            Self::ParticipantLeft(_) => event_types::PARTICIPANT_LEFT,
            Self::SessionEnded(_) => event_types::SESSION_ENDED,
            Self::TranscriptionReady(_) => event_types::TRANSCRIPTION_READY,
            Self::RecordingReady(_) => event_types::RECORDING_READY,
            Self::Unhandled(event_type) => event_type,
        }
    }
}

fn from_payload<T: DeserializeOwned>(payload: Value) -> Result<T, WebhookError> {
    serde_json::from_value(payload).map_err(|e| WebhookError::InvalidPayload(e.to_string()))
}
