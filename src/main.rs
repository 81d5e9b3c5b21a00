//! Matchmaker - Hackathon Teammate Matching Agent
//!
//! Main entry point for the CLI application.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use matchmaker::core::ProfileRecord;
use matchmaker::{Agent, Config, Repl};

/// Matchmaker - find hackathon teammates with a local model
#[derive(Parser, Debug)]
#[command(name = "matchmaker")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Model to drive the tool-calling loop
    #[arg(long, short = 'm')]
    model: Option<String>,

    /// People directory (JSON)
    #[arg(long, short = 'p')]
    people: Option<PathBuf>,

    /// Username to load and save the profile under
    #[arg(long, short = 'u')]
    user: Option<String>,

    /// Profile JSON file; runs one match and exits
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Build configuration
    let mut config = Config::load();

    // Apply CLI overrides
    if let Some(ref model) = args.model {
        config.model.name = model.clone();
    }

    if let Some(ref people) = args.people {
        config.data.people_path = people.clone();
    }

    if args.debug {
        config.agent.debug = true;
    }

    let filter = if config.agent.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Single run mode
    if let Some(path) = args.profile {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("reading profile {}", path.display()))?;
        let profile: ProfileRecord = serde_json::from_str(&content)
            .with_context(|| format!("parsing profile {}", path.display()))?;

        let mut agent = Agent::with_config(config)?;
        agent.initialize().await?;

        let result = match args.user {
            Some(ref user) => agent.find_matches(user, &profile).await?,
            None => agent.match_once(&profile).await,
        };
        println!("{}", result.text);

        if !result.success {
            std::process::exit(2);
        }
        return Ok(());
    }

    // Interactive REPL mode
    let mut repl = Repl::with_config(config, args.user)?;
    repl.run().await?;

    Ok(())
}
