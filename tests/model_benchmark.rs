//! Model benchmark tests
//!
//! Runs the same matching request against several local models. Needs a
//! running Ollama with the models pulled.

use std::time::{Duration, Instant};

use matchmaker::agent::Agent;
use matchmaker::core::{Config, ExperienceLevel, ProfileRecord};
use matchmaker::directory::PeopleDirectory;
use matchmaker::llm::OllamaClient;
use matchmaker::store::ProfileStore;
use std::sync::Arc;
use tokio::time::timeout;

const PEOPLE: &str = r#"[
    {"id": 1, "name": "Marcus Chen", "skills": ["Go", "PostgreSQL"],
     "interests": ["Healthcare"], "experience_level": "advanced",
     "role_preferences": ["Backend Developer"]},
    {"id": 2, "name": "Priya Nair", "skills": ["Node.js", "Python"],
     "interests": ["AI", "Healthcare"], "experience_level": "intermediate",
     "role_preferences": ["Backend Developer"]},
    {"id": 3, "name": "Leo Martins", "skills": ["Figma"],
     "interests": ["Education"], "experience_level": "beginner",
     "role_preferences": ["Designer"]}
]"#;

/// Result of a single benchmark run
#[derive(Debug)]
pub struct BenchmarkResult {
    pub model: String,
    pub success: bool,
    pub turns: usize,
    pub duration: Duration,
    pub error: Option<String>,
}

/// Benchmark harness for comparing models
pub struct ModelBenchmark {
    pub models: Vec<String>,
    pub timeout_secs: u64,
}

impl Default for ModelBenchmark {
    fn default() -> Self {
        Self {
            models: vec!["qwen3:8b".to_string(), "llama3.1:8b".to_string()],
            timeout_secs: 300,
        }
    }
}

impl ModelBenchmark {
    /// Run the profile against all models and collect results
    pub async fn run_profile(&self, profile: &ProfileRecord) -> Vec<BenchmarkResult> {
        let mut results = Vec::new();

        for model in &self.models {
            println!("\n=== Testing model: {} ===", model);
            results.push(self.run_single(model, profile).await);
        }

        results
    }

    async fn run_single(&self, model: &str, profile: &ProfileRecord) -> BenchmarkResult {
        let failed = |error: String, duration: Duration| BenchmarkResult {
            model: model.to_string(),
            success: false,
            turns: 0,
            duration,
            error: Some(error),
        };

        let mut config = Config::default();
        config.model.name = model.to_string();

        let dir = tempfile::tempdir().expect("temp dir");
        let store = ProfileStore::open(dir.path().join("store.json"), 30).expect("store");
        let client = OllamaClient::from_config(&config).expect("client");
        let directory = PeopleDirectory::from_json_str(PEOPLE).expect("fixture people");
        let mut agent =
            Agent::from_parts(config, directory, Arc::new(client), store).expect("agent");

        match timeout(Duration::from_secs(30), agent.initialize()).await {
            Err(_) => return failed("Initialization timeout".into(), Duration::ZERO),
            Ok(Err(e)) => return failed(format!("Init error: {}", e), Duration::ZERO),
            Ok(Ok(())) => {}
        }

        let start = Instant::now();
        let run = timeout(
            Duration::from_secs(self.timeout_secs),
            agent.find_matches("benchmark", profile),
        )
        .await;
        let duration = start.elapsed();

        match run {
            Ok(Ok(result)) => BenchmarkResult {
                model: model.to_string(),
                success: result.success,
                turns: result.turns_used,
                duration,
                error: (!result.success).then_some(result.text),
            },
            Ok(Err(e)) => failed(e.to_string(), duration),
            Err(_) => failed("Run timeout".into(), duration),
        }
    }

    /// Print results in a formatted table
    pub fn print_results(results: &[BenchmarkResult]) {
        println!("\n+------------------+---------+-------+----------+---------------------+");
        println!("| Model            | Success | Turns | Duration | Error               |");
        println!("+------------------+---------+-------+----------+---------------------+");

        for result in results {
            let success = if result.success { "yes" } else { "no" };
            let error = result.error.as_deref().unwrap_or("-");
            let error_short: String = if error.chars().count() > 18 {
                format!("{}...", error.chars().take(15).collect::<String>())
            } else {
                error.to_string()
            };

            println!(
                "| {:16} | {:7} | {:5} | {:7.2}s | {:19} |",
                result.model,
                success,
                result.turns,
                result.duration.as_secs_f64(),
                error_short
            );
        }

        println!("+------------------+---------+-------+----------+---------------------+");
    }
}

/// Python/ML participant looking for backend help
#[tokio::test]
#[ignore] // Run with: cargo test --test model_benchmark -- --ignored
async fn test_backend_match() {
    let profile = ProfileRecord {
        name: "Sarah".into(),
        skills: vec!["Python".into(), "ML".into()],
        interests: vec!["AI".into(), "Healthcare".into()],
        experience: ExperienceLevel::Intermediate,
        roles: vec!["ML Engineer".into()],
        goal: "find backend devs".into(),
    };

    let results = ModelBenchmark::default().run_profile(&profile).await;
    ModelBenchmark::print_results(&results);

    assert!(results.iter().all(|r| r.turns <= 3));
    assert!(results.iter().any(|r| r.success));
}
