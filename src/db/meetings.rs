//! Meeting record persistence.
//!
//! CRUD operations for the `meetings` table. Status transitions driven by
//! webhooks are conditional updates so a duplicate delivery cannot apply the
//! same transition twice.

use anyhow::{Context, Result};
use rusqlite::{params, types::Type, Connection, OptionalExtension, Row};

use crate::meeting::MeetingStatus;

/// A meeting record from the database.
#[derive(Debug, Clone)]
pub struct MeetingRecord {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub agent_id: String,
    pub status: MeetingStatus,
    pub started_at: Option<String>,
    pub ended_at: Option<String>,
    pub transcript_url: Option<String>,
    pub recording_url: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl MeetingRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            user_id: row.get(2)?,
            agent_id: row.get(3)?,
            status: parse_status(row.get(4)?)?,
            started_at: row.get(5)?,
            ended_at: row.get(6)?,
            transcript_url: row.get(7)?,
            recording_url: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

fn parse_status(value: String) -> rusqlite::Result<MeetingStatus> {
    MeetingStatus::parse(&value)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, err.into()))
}

const MEETING_COLUMNS: &str = "id, name, user_id, agent_id, status, started_at, ended_at, \
                               transcript_url, recording_url, created_at, updated_at";

/// Matches meetings a call-start event is allowed to activate.
const ACTIVATABLE_CLAUSE: &str = "status NOT IN (?2, ?3, ?4, ?5)";

fn blockers() -> [&'static str; 4] {
    MeetingStatus::ACTIVATION_BLOCKERS.map(|status| status.as_str())
}

/// Repository for meeting records.
pub struct MeetingRepository;

impl MeetingRepository {
    /// Insert a new meeting (status = upcoming). Returns the generated meeting ID.
    pub fn insert(conn: &Connection, name: &str, user_id: &str, agent_id: &str) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = super::timestamp_now();

        conn.execute(
            "INSERT INTO meetings (id, name, user_id, agent_id, status, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![id, name, user_id, agent_id, MeetingStatus::Upcoming.as_str(), now],
        )
        .context("Failed to insert meeting")?;

        Ok(id)
    }

    pub fn get(conn: &Connection, id: &str) -> Result<Option<MeetingRecord>> {
        conn.query_row(
            &format!("SELECT {} FROM meetings WHERE id = ?1", MEETING_COLUMNS),
            params![id],
            MeetingRecord::from_row,
        )
        .optional()
        .context("Failed to query meeting")
    }

    /// Get a meeting only if it is still in a status that can be activated.
    pub fn find_activatable(conn: &Connection, id: &str) -> Result<Option<MeetingRecord>> {
        let [b1, b2, b3, b4] = blockers();
        conn.query_row(
            &format!(
                "SELECT {} FROM meetings WHERE id = ?1 AND {}",
                MEETING_COLUMNS, ACTIVATABLE_CLAUSE
            ),
            params![id, b1, b2, b3, b4],
            MeetingRecord::from_row,
        )
        .optional()
        .context("Failed to query activatable meeting")
    }

    /// Mark the meeting active with its start time.
    ///
    /// Returns false when the meeting no longer exists or another delivery
    /// already moved it out of an activatable status.
    pub fn activate(conn: &Connection, id: &str, started_at: &str) -> Result<bool> {
        let [b1, b2, b3, b4] = blockers();
        let updated = conn
            .execute(
                &format!(
                    "UPDATE meetings SET status = ?6, started_at = ?7, updated_at = ?7 \
                     WHERE id = ?1 AND {}",
                    ACTIVATABLE_CLAUSE
                ),
                params![
                    id,
                    b1,
                    b2,
                    b3,
                    b4,
                    MeetingStatus::Active.as_str(),
                    started_at
                ],
            )
            .context("Failed to activate meeting")?;

        Ok(updated == 1)
    }

    /// Move an active meeting to processing once its call session ends.
    pub fn mark_processing(conn: &Connection, id: &str, ended_at: &str) -> Result<bool> {
        let updated = conn
            .execute(
                "UPDATE meetings SET status = ?1, ended_at = ?2, updated_at = ?2 \
                 WHERE id = ?3 AND status = ?4",
                params![
                    MeetingStatus::Processing.as_str(),
                    ended_at,
                    id,
                    MeetingStatus::Active.as_str()
                ],
            )
            .context("Failed to mark meeting as processing")?;

        Ok(updated == 1)
    }

    pub fn set_transcript_url(conn: &Connection, id: &str, url: &str) -> Result<bool> {
        let updated = conn
            .execute(
                "UPDATE meetings SET transcript_url = ?1, updated_at = ?2 WHERE id = ?3",
                params![url, super::timestamp_now(), id],
            )
            .context("Failed to store transcript url")?;

        Ok(updated == 1)
    }

    pub fn set_recording_url(conn: &Connection, id: &str, url: &str) -> Result<bool> {
        let updated = conn
            .execute(
                "UPDATE meetings SET recording_url = ?1, updated_at = ?2 WHERE id = ?3",
                params![url, super::timestamp_now(), id],
            )
            .context("Failed to store recording url")?;

        Ok(updated == 1)
    }

    /// Unconditionally set the meeting status.
    #[cfg(test)]
    pub(crate) fn update_status(conn: &Connection, id: &str, status: MeetingStatus) -> Result<bool> {
        let updated = conn
            .execute(
                "UPDATE meetings SET status = ?1, updated_at = ?2 WHERE id = ?3",
                params![status.as_str(), super::timestamp_now(), id],
            )
            .context("Failed to update meeting status")?;

        Ok(updated == 1)
    }

    /// List meetings, newest first.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<MeetingRecord>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM meetings ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                MEETING_COLUMNS
            ))
            .context("Failed to prepare meetings list query")?;

        let meetings = stmt
            .query_map(params![limit as i64], MeetingRecord::from_row)
            .context("Failed to list meetings")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to map meetings")?;

        Ok(meetings)
    }
}
