//! Video provider webhook processing.
//!
//! A delivery is verified against its signature, parsed, and dispatched on
//! its `type`. Handled events:
//! - `call.session_started`: activate the meeting and bridge its agent in
//! - `call.session_participant_left`: end the call
//! - `call.session_ended`: move the meeting to processing
//! - `call.transcription_ready` / `call.recording_ready`: store asset URLs
//!
//! Anything else is acknowledged so the provider does not retry it.

pub mod error;
pub mod event;
pub mod handler;

pub use error::WebhookError;
pub use event::WebhookEvent;
pub use handler::{WebhookOutcome, WebhookRequest, WebhookService};
