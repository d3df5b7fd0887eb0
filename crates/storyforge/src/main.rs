//! Storyforge CLI binary.
//!
//! - Describe a subject from a reference image
//! - Write four-scene scripts
//! - Produce storyboards with live progress and persist them as sessions
//! - Regenerate single scenes of a stored session

use clap::Parser;
use storyforge::{LoggingConfig, StoryforgeConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands};

    // Parse command-line arguments
    let cli = Cli::parse();

    // Load .env before anything reads the API key
    dotenvy::dotenv().ok();

    // Initialize tracing
    let log_level = if cli.verbose { "debug" } else { "info" };
    init_logging(
        LoggingConfig::new()
            .with_log_level(log_level)
            .with_json_logs(cli.json_logs),
    )?;

    let config = StoryforgeConfig::load_with(cli.config.as_deref())?;

    // Execute the requested command
    match cli.command {
        Commands::Describe { identity } => {
            cli::describe(&config, &identity).await?;
        }
        Commands::Script(args) => {
            cli::script(&config, &args).await?;
        }
        Commands::Produce(args) => {
            cli::produce(&config, &args).await?;
        }
        Commands::Regenerate { session, scene } => {
            cli::regenerate(&config, session, scene).await?;
        }
        Commands::Show { session } => {
            cli::show(&config, session).await?;
        }
        Commands::Sessions => {
            cli::sessions(&config).await?;
        }
    }

    Ok(())
}
