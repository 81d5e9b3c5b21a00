//! LLM module - model client integrations
//!
//! Provides the model client abstraction with Ollama as the backend.

pub mod ollama;
pub mod traits;

pub use ollama::OllamaClient;
pub use traits::{GenerateOptions, ModelClient, ModelRequest};
