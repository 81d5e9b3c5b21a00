//! Model client trait for abstracting different backends
//!
//! The orchestration loop only depends on this trait, so tests can swap in
//! scripted clients and other backends can be added beside Ollama.

use async_trait::async_trait;

use crate::core::{ModelReply, Result, ToolDefinition, Turn};

/// One request to the model: the whole transcript plus the callable tools
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    /// Ordered transcript of the run so far
    pub transcript: &'a [Turn],
    /// Tools the model may call, in registration order
    pub tools: &'a [ToolDefinition],
}

impl<'a> ModelRequest<'a> {
    /// Create a new request
    pub fn new(transcript: &'a [Turn], tools: &'a [ToolDefinition]) -> Self {
        Self { transcript, tools }
    }
}

/// Options for generation
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Temperature for sampling (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
}

/// Stateless request/response interface to a conversational model
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the transcript and tool declarations, get an answer or tool calls
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelReply>;

    /// Check if the configured model is available
    async fn is_available(&self) -> Result<bool>;

    /// Get the client name
    fn name(&self) -> &str;
}
