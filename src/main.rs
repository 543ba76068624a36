use anyhow::Result;
use clap::Parser;
use meetai::{
    app,
    cli::{handle_agent_command, handle_avatar_command, handle_meeting_command, Cli, CliCommand},
    config::Config,
    db::Database,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let log_level = if cli.verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match cli.command {
        Some(CliCommand::Version) => {
            println!("meetai {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Some(CliCommand::Avatar(args)) => {
            handle_avatar_command(args)?;
            return Ok(());
        }
        Some(CliCommand::Agent(args)) => {
            handle_agent_command(args, &open_database()?)?;
            return Ok(());
        }
        Some(CliCommand::Meeting(args)) => {
            handle_meeting_command(args, &open_database()?)?;
            return Ok(());
        }
        Some(CliCommand::Serve) | None => {}
    }

    app::run_service().await
}

fn open_database() -> Result<Database> {
    let config = Config::load()?;
    Database::open(&config.db_path()?)
}
