//! Meeting lifecycle status.

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a meeting row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    /// Scheduled, call not started yet.
    Upcoming,
    Active,
    Completed,
    Processing,
    Cancelled,
}

impl MeetingStatus {
    /// Statuses from which a call-start event must not (re)activate a meeting.
    pub const ACTIVATION_BLOCKERS: [MeetingStatus; 4] = [
        MeetingStatus::Completed,
        MeetingStatus::Active,
        MeetingStatus::Processing,
        MeetingStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upcoming => "upcoming",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Processing => "processing",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Result<MeetingStatus> {
        match s {
            "upcoming" => Ok(Self::Upcoming),
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            "processing" => Ok(Self::Processing),
            "cancelled" => Ok(Self::Cancelled),
            _ => anyhow::bail!("Invalid meeting status: {}", s),
        }
    }
}

impl std::fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
