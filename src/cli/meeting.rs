//! CLI handler for meeting commands.
//!
//! Commands read and write the local database directly; the running server
//! picks changes up on the next webhook.

use anyhow::{bail, Result};

use crate::cli::args::{MeetingCliArgs, MeetingCommand};
use crate::db::{AgentRepository, Database, MeetingRecord, MeetingRepository};

pub fn handle_meeting_command(args: MeetingCliArgs, db: &Database) -> Result<()> {
    match args.command {
        MeetingCommand::Create { name, user, agent } => {
            let id = create_meeting(db, &name, &user, &agent)?;
            println!("Meeting scheduled (id: {})", id);
            println!("Use this ID as the call ID and as custom.meetingId when creating the call.");
            Ok(())
        }
        MeetingCommand::List { limit } => list_meetings(db, limit),
        MeetingCommand::Show { id } => show_meeting(db, &id),
    }
}

fn create_meeting(db: &Database, name: &str, user: &str, agent_id: &str) -> Result<String> {
    if name.trim().is_empty() {
        bail!("Meeting name cannot be empty");
    }

    db.with_conn(|conn| {
        if AgentRepository::get(conn, agent_id)?.is_none() {
            bail!("Agent {} not found", agent_id);
        }
        MeetingRepository::insert(conn, name.trim(), user, agent_id)
    })
}

fn list_meetings(db: &Database, limit: usize) -> Result<()> {
    let meetings = db.with_conn(|conn| MeetingRepository::list(conn, limit))?;

    if meetings.is_empty() {
        println!("No meetings scheduled yet.");
        return Ok(());
    }

    for meeting in &meetings {
        println!(
            "{} {} [{}] - {}",
            meeting.id,
            meeting.name,
            meeting.status,
            meeting.started_at.as_deref().unwrap_or("not started")
        );
    }

    Ok(())
}

fn show_meeting(db: &Database, id: &str) -> Result<()> {
    let meeting = db.with_conn(|conn| MeetingRepository::get(conn, id))?;
    match meeting {
        Some(meeting) => {
            println!("{}", describe(&meeting));
            Ok(())
        }
        None => bail!("Meeting not found: {}", id),
    }
}

fn describe(meeting: &MeetingRecord) -> String {
    let mut lines = vec![
        format!("Meeting {}: {}", meeting.id, meeting.name),
        format!("Status: {}", meeting.status),
        format!("Agent: {}", meeting.agent_id),
    ];

    if let Some(started) = &meeting.started_at {
        lines.push(format!("Started: {}", started));
    }
    if let Some(ended) = &meeting.ended_at {
        lines.push(format!("Ended: {}", ended));
    }
    if let Some(url) = &meeting.transcript_url {
        lines.push(format!("Transcript: {}", url));
    }
    if let Some(url) = &meeting.recording_url {
        lines.push(format!("Recording: {}", url));
    }

    lines.join("\n")
}
