//! Matching agent
//!
//! Wires the people directory, tools, model client and store together and
//! persists the outcome of each run.

use std::sync::Arc;

use crate::agent::orchestrator::{LoopSettings, Orchestrator};
use crate::core::{Config, MatchError, OrchestrationResult, ProfileRecord, Result};
use crate::directory::PeopleDirectory;
use crate::llm::{ModelClient, OllamaClient};
use crate::store::{ProfileStore, ProfileUpdate};
use crate::tools::ToolRegistry;

/// Main agent that finds teammates and remembers results
pub struct Agent {
    /// Configuration
    config: Config,
    /// Model client
    model: Arc<dyn ModelClient>,
    /// Orchestration loop
    orchestrator: Orchestrator,
    /// Profiles and match history
    store: ProfileStore,
    /// Size of the people directory
    people: usize,
}

impl Agent {
    /// Create an agent backed by Ollama from configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let directory = PeopleDirectory::load(&config.data.people_path)?;
        let model: Arc<dyn ModelClient> = Arc::new(OllamaClient::from_config(&config)?);
        let store = ProfileStore::open(&config.data.store_path, config.data.history_ttl_days)?;
        Self::from_parts(config, directory, model, store)
    }

    /// Assemble an agent from already-built collaborators
    pub fn from_parts(
        config: Config,
        directory: PeopleDirectory,
        model: Arc<dyn ModelClient>,
        store: ProfileStore,
    ) -> Result<Self> {
        let people = directory.len();
        let tools = ToolRegistry::with_people(Arc::new(directory))?;
        let orchestrator = Orchestrator::new(
            model.clone(),
            Arc::new(tools),
            LoopSettings::from_config(&config),
        );

        Ok(Self {
            config,
            model,
            orchestrator,
            store,
            people,
        })
    }

    /// Check the model backend is reachable and has the model
    pub async fn initialize(&self) -> Result<()> {
        let available = self.model.is_available().await.map_err(|_| {
            MatchError::model(format!(
                "Cannot reach {} at {}",
                self.model.name(),
                self.config.ollama_url()
            ))
        })?;

        if !available {
            return Err(MatchError::ModelNotFound(self.config.model.name.clone()));
        }

        tracing::info!(
            model = %self.config.model.name,
            people = self.people,
            "Agent ready"
        );
        Ok(())
    }

    /// Save the profile, run a match, and record the result
    pub async fn find_matches(
        &mut self,
        username: &str,
        profile: &ProfileRecord,
    ) -> Result<OrchestrationResult> {
        self.store.save_profile(username, profile)?;

        let result = self.orchestrator.run(profile).await;

        let query = format!(
            "Skills: {}, Interests: {}",
            profile.skills.join(", "),
            profile.interests.join(", ")
        );
        self.store
            .save_match(username, &result.text, &query, result.success)?;

        Ok(result)
    }

    /// Run a match without touching the store
    pub async fn match_once(&self, profile: &ProfileRecord) -> OrchestrationResult {
        self.orchestrator.run(profile).await
    }

    /// Change one field of a saved profile
    pub fn update_profile(&mut self, username: &str, update: ProfileUpdate) -> Result<()> {
        self.store.update_profile(username, update)
    }

    /// Get the store
    pub fn store(&self) -> &ProfileStore {
        &self.store
    }

    /// Get mutable store
    pub fn store_mut(&mut self) -> &mut ProfileStore {
        &mut self.store
    }

    /// Get current configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Number of people available to the tools
    pub fn people_count(&self) -> usize {
        self.people
    }

    /// Names of the tools the model can call
    pub fn tool_names(&self) -> Vec<String> {
        self.orchestrator
            .tools()
            .names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
