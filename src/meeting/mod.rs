//! Meeting domain types.
//!
//! Meetings are created through the CLI and moved through their lifecycle by
//! video provider webhooks.

pub mod status;

pub use status::MeetingStatus;
