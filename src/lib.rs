//! Matchmaker - Hackathon Teammate Matching Agent
//!
//! Drives a local Ollama model through a bounded tool-calling loop to pick
//! the best teammates for a participant's profile from a people directory.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **LLM**: Model client abstraction with Ollama implementation
//! - **Tools**: Tool registry and the people-search tools
//! - **Agent**: The orchestration loop, fallback extraction, and facade
//! - **Directory**: The people the tools search over
//! - **Store**: Saved profiles and match history
//! - **CLI**: Command-line interface and REPL
//!
//! # Usage
//!
//! ```rust,no_run
//! use matchmaker::{Agent, Config};
//! use matchmaker::core::ProfileRecord;
//!
//! #[tokio::main]
//! async fn main() -> matchmaker::Result<()> {
//!     let mut agent = Agent::with_config(Config::load())?;
//!     agent.initialize().await?;
//!
//!     let mut profile = ProfileRecord::new("Sarah");
//!     profile.skills = vec!["Python".into(), "ML".into()];
//!     let result = agent.find_matches("sarah", &profile).await?;
//!     println!("{}", result.text);
//!     Ok(())
//! }
//! ```

pub mod agent;
pub mod cli;
pub mod core;
pub mod directory;
pub mod llm;
pub mod store;
pub mod tools;

// Re-export commonly used items
pub use agent::{Agent, Orchestrator};
pub use cli::Repl;
pub use core::{Config, MatchError, OrchestrationResult, Result};
