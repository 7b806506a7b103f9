//! beatbuddy - chat with a music recommender backed by Last.fm
//!
//! Subcommands:
//! - `beatbuddy chat` - Interactive session (default)
//! - `beatbuddy ask <text>` - Single turn, print the reply
//! - `beatbuddy functions` - Print the function catalog offered to the model
//! - `beatbuddy config` - Print the effective configuration and its sources

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

mod commands;
mod repl;

#[derive(Parser)]
#[command(name = "beatbuddy")]
#[command(about = "Music recommendations and playlists through conversation")]
#[command(version)]
struct Cli {
    /// Config file (replaces ./beatbuddy.toml)
    #[arg(short, long, global = true, env = "BEATBUDDY_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session
    Chat,

    /// Send one message and print the reply
    Ask {
        /// What to say
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Print the functions the model can call, as JSON
    Functions,

    /// Show the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_path = match cli.config.as_deref() {
        Some(raw) => {
            let path: PathBuf = beatconf::expand_path(raw);
            if !path.exists() {
                bail!("config file {} does not exist", path.display());
            }
            Some(path)
        }
        None => None,
    };

    let (config, sources) = beatconf::BeatConfig::load_with_sources_from(config_path.as_deref())?;

    let filter = tracing_subscriber::EnvFilter::new(&config.telemetry.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(files = ?sources.files, env = ?sources.env_overrides, "configuration loaded");

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let conversation = commands::build_conversation(&config)?;
            repl::run(conversation).await?;
        }
        Commands::Ask { text } => {
            let conversation = commands::build_conversation(&config)?;
            let line = text.join(" ");
            let mut stdout = std::io::stdout();
            commands::ask(&conversation, &line, &mut stdout).await?;
        }
        Commands::Functions => {
            commands::functions()?;
        }
        Commands::Config => {
            commands::show_config(&config, &sources);
        }
    }

    Ok(())
}
