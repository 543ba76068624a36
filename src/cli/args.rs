use clap::{Args as ClapArgs, Parser, Subcommand};

use crate::avatar::AvatarVariant;

#[derive(Parser, Debug)]
#[command(name = "meetai")]
#[command(about = "AI agents for video meetings", long_about = None)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<CliCommand>,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// Run the webhook server (default)
    Serve,
    /// Print version information
    Version,
    /// Generate an avatar for a seed
    Avatar(AvatarCliArgs),
    /// Manage AI agents
    Agent(AgentCliArgs),
    /// Manage meetings
    Meeting(MeetingCliArgs),
}

#[derive(ClapArgs, Debug)]
pub struct AvatarCliArgs {
    /// Seed the avatar is derived from (usually a name)
    pub seed: String,
    /// Avatar style: botttsNeutral or initials
    #[arg(long, default_value = "initials")]
    pub variant: AvatarVariant,
    /// Print an HTML snippet with fallback instead of raw SVG
    #[arg(long)]
    pub html: bool,
    /// CSS class for the HTML snippet
    #[arg(long)]
    pub class: Option<String>,
}

#[derive(ClapArgs, Debug)]
pub struct AgentCliArgs {
    #[command(subcommand)]
    pub command: AgentCommand,
}

#[derive(Subcommand, Debug)]
pub enum AgentCommand {
    /// Create an agent
    Create {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Owning user ID
        #[arg(short, long)]
        user: String,
        /// Instructions given to the AI when it joins a call
        #[arg(short, long)]
        instructions: String,
    },
    /// List agents
    List {
        /// Maximum number of agents to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
}

#[derive(ClapArgs, Debug)]
pub struct MeetingCliArgs {
    #[command(subcommand)]
    pub command: MeetingCommand,
}

#[derive(Subcommand, Debug)]
pub enum MeetingCommand {
    /// Schedule a meeting with an agent
    Create {
        /// Meeting name
        #[arg(short, long)]
        name: String,
        /// Owning user ID
        #[arg(short, long)]
        user: String,
        /// Agent ID that joins the call
        #[arg(short, long)]
        agent: String,
    },
    /// List meetings
    List {
        /// Maximum number of meetings to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Show a meeting
    Show {
        /// Meeting ID
        id: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_serve() {
        let cli = Cli::try_parse_from(["meetai"]).unwrap();
        assert!(cli.command.is_none());
        assert!(!cli.verbose);
    }

    #[test]
    fn test_avatar_args() {
        let argv = ["meetai", "avatar", "Ada", "--variant", "botttsNeutral", "-v"];
        let cli = Cli::try_parse_from(argv).unwrap();
        assert!(cli.verbose);
        match cli.command {
            Some(CliCommand::Avatar(args)) => {
                assert_eq!(args.seed, "Ada");
                assert_eq!(args.variant, AvatarVariant::BotttsNeutral);
                assert!(!args.html);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_avatar_rejects_unknown_variant() {
        assert!(Cli::try_parse_from(["meetai", "avatar", "Ada", "--variant", "pixel"]).is_err());
    }

    #[test]
    fn test_meeting_create_args() {
        let cli = Cli::try_parse_from([
            "meetai", "meeting", "create", "--name", "Standup", "--user", "u1", "--agent", "a1",
        ])
        .unwrap();
        match cli.command {
            Some(CliCommand::Meeting(MeetingCliArgs {
                command: MeetingCommand::Create { name, user, agent },
            })) => {
                assert_eq!(name, "Standup");
                assert_eq!(user, "u1");
                assert_eq!(agent, "a1");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
