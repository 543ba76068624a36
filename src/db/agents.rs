//! Agent record persistence.

use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension, Row};

/// An AI agent configuration that can join a meeting's call.
#[derive(Debug, Clone)]
pub struct AgentRecord {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub instructions: String,
    pub created_at: String,
    pub updated_at: String,
}

impl AgentRecord {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            user_id: row.get(2)?,
            instructions: row.get(3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

const AGENT_COLUMNS: &str = "id, name, user_id, instructions, created_at, updated_at";

/// Repository for agent records.
pub struct AgentRepository;

impl AgentRepository {
    /// Insert a new agent. Returns the generated agent ID.
    pub fn insert(
        conn: &Connection,
        name: &str,
        user_id: &str,
        instructions: &str,
    ) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = super::timestamp_now();

        conn.execute(
            "INSERT INTO agents (id, name, user_id, instructions, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![id, name, user_id, instructions, now],
        )
        .context("Failed to insert agent")?;

        Ok(id)
    }

    pub fn get(conn: &Connection, id: &str) -> Result<Option<AgentRecord>> {
        conn.query_row(
            &format!("SELECT {} FROM agents WHERE id = ?1", AGENT_COLUMNS),
            params![id],
            AgentRecord::from_row,
        )
        .optional()
        .context("Failed to query agent")
    }

    /// List agents, newest first.
    pub fn list(conn: &Connection, limit: usize) -> Result<Vec<AgentRecord>> {
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM agents ORDER BY created_at DESC, rowid DESC LIMIT ?1",
                AGENT_COLUMNS
            ))
            .context("Failed to prepare agents list query")?;

        let agents = stmt
            .query_map(params![limit as i64], AgentRecord::from_row)
            .context("Failed to list agents")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("Failed to map agents")?;

        Ok(agents)
    }
}
