//! CLI handler for agent commands.

use anyhow::{bail, Result};

use crate::cli::args::{AgentCliArgs, AgentCommand};
use crate::db::{AgentRecord, AgentRepository, Database};

pub fn handle_agent_command(args: AgentCliArgs, db: &Database) -> Result<()> {
    match args.command {
        AgentCommand::Create {
            name,
            user,
            instructions,
        } => {
            let id = create_agent(db, &name, &user, &instructions)?;
            println!("Agent created (id: {})", id);
            Ok(())
        }
        AgentCommand::List { limit } => {
            let agents = db.with_conn(|conn| AgentRepository::list(conn, limit))?;
            if agents.is_empty() {
                println!("No agents yet. Create one with: meetai agent create");
                return Ok(());
            }
            for agent in &agents {
                println!("{}", summary_line(agent));
            }
            Ok(())
        }
    }
}

fn create_agent(db: &Database, name: &str, user: &str, instructions: &str) -> Result<String> {
    if name.trim().is_empty() {
        bail!("Agent name cannot be empty");
    }
    if instructions.trim().is_empty() {
        bail!("Agent instructions cannot be empty");
    }
    db.with_conn(|conn| AgentRepository::insert(conn, name.trim(), user, instructions))
}

fn summary_line(agent: &AgentRecord) -> String {
    let preview: String = agent.instructions.chars().take(60).collect();
    let ellipsis = if agent.instructions.chars().count() > 60 { "..." } else { "" };
    format!(
        "{} {} (user {}) - {}{}",
        agent.id, agent.name, agent.user_id, preview, ellipsis
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_agent_validates_input() {
        let db = Database::open_in_memory().unwrap();
        assert!(create_agent(&db, "  ", "u1", "Be helpful").is_err());
        assert!(create_agent(&db, "Coach", "u1", "").is_err());

        let id = create_agent(&db, " Coach ", "u1", "Be helpful").unwrap();
        let agent = db
            .with_conn(|conn| AgentRepository::get(conn, &id))
            .unwrap()
            .unwrap();
        assert_eq!(agent.name, "Coach");
    }

    #[test]
    fn test_summary_line_truncates_instructions() {
        let db = Database::open_in_memory().unwrap();
        let long = "x".repeat(80);
        let id = create_agent(&db, "Coach", "u1", &long).unwrap();
        let agent = db
            .with_conn(|conn| AgentRepository::get(conn, &id))
            .unwrap()
            .unwrap();

        let line = summary_line(&agent);
        assert!(line.starts_with(&id));
        assert!(line.ends_with(&format!("{}...", "x".repeat(60))));
    }
}
