pub mod agent;
pub mod args;
pub mod avatar;
pub mod meeting;

pub use agent::handle_agent_command;
pub use args::{AgentCliArgs, AvatarCliArgs, Cli, CliCommand, MeetingCliArgs};
pub use avatar::handle_avatar_command;
pub use meeting::handle_meeting_command;
