//! Ollama client implementation
//!
//! Async HTTP client for the Ollama chat API with tool calling.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{Config, MatchError, ModelReply, Result, ToolCall, ToolDefinition, Turn};
use crate::llm::traits::{GenerateOptions, ModelClient, ModelRequest};

/// Ollama API client
#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    options: GenerateOptions,
}

/// Ollama chat request
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolDefinition]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<OllamaOptions>,
    stream: bool,
}

/// Ollama message format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_name: Option<String>,
}

/// Ollama tool call format
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaToolCall {
    function: OllamaFunction,
}

/// Ollama function in tool call
#[derive(Debug, Clone, Serialize, Deserialize)]
struct OllamaFunction {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

/// Ollama generation options
#[derive(Debug, Serialize)]
struct OllamaOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

/// Ollama chat response (non-streaming)
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: OllamaMessage,
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

impl OllamaClient {
    /// Create a new Ollama client from configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.ollama.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.ollama_url(),
            model: config.model.name.clone(),
            options: GenerateOptions {
                temperature: Some(config.model.temperature),
                max_tokens: None,
            },
        })
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Convert a transcript turn to Ollama format
    fn to_ollama_message(turn: &Turn) -> OllamaMessage {
        match turn {
            Turn::User { text } => OllamaMessage {
                role: "user".to_string(),
                content: text.clone(),
                tool_calls: None,
                tool_name: None,
            },
            Turn::Assistant { text, tool_calls } => OllamaMessage {
                role: "assistant".to_string(),
                content: text.clone(),
                tool_calls: (!tool_calls.is_empty()).then(|| {
                    tool_calls
                        .iter()
                        .map(|tc| OllamaToolCall {
                            function: OllamaFunction {
                                name: tc.name.clone(),
                                arguments: tc.arguments.clone(),
                            },
                        })
                        .collect()
                }),
                tool_name: None,
            },
            Turn::ToolResult {
                tool_name, payload, ..
            } => OllamaMessage {
                role: "tool".to_string(),
                content: payload.clone(),
                tool_calls: None,
                tool_name: Some(tool_name.clone()),
            },
        }
    }

    /// Convert an Ollama message to a reply.
    ///
    /// Ollama does not assign call ids, so they are derived from the number
    /// of assistant turns already in the transcript and the call's position.
    fn to_model_reply(message: OllamaMessage, transcript: &[Turn]) -> ModelReply {
        let round = transcript
            .iter()
            .filter(|t| matches!(t, Turn::Assistant { .. }))
            .count();

        let calls = message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(i, tc)| ToolCall {
                id: format!("call_{}_{}", round, i),
                name: tc.function.name,
                arguments: normalize_arguments(tc.function.arguments),
            })
            .collect();

        ModelReply::from_parts(message.content, calls)
    }

    fn map_send_error(&self, e: reqwest::Error) -> MatchError {
        if e.is_connect() {
            MatchError::model(format!(
                "Cannot connect to Ollama at {}. Is it running?",
                self.base_url
            ))
        } else {
            MatchError::from(e)
        }
    }

    /// List models installed in Ollama
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            return Err(MatchError::model("Failed to list models"));
        }

        let models_response: ModelsResponse = response.json().await?;
        Ok(models_response.models.into_iter().map(|m| m.name).collect())
    }
}

/// Some models send arguments as a JSON-encoded string instead of an object
fn normalize_arguments(arguments: serde_json::Value) -> serde_json::Value {
    match arguments {
        serde_json::Value::String(raw) => serde_json::from_str(&raw)
            .unwrap_or_else(|_| serde_json::Value::Object(Default::default())),
        serde_json::Value::Null => serde_json::Value::Object(Default::default()),
        other => other,
    }
}

#[async_trait]
impl ModelClient for OllamaClient {
    async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelReply> {
        let messages: Vec<OllamaMessage> = request
            .transcript
            .iter()
            .map(Self::to_ollama_message)
            .collect();

        let body = ChatRequest {
            model: &self.model,
            messages,
            tools: (!request.tools.is_empty()).then_some(request.tools),
            options: Some(OllamaOptions {
                temperature: self.options.temperature,
                num_predict: self.options.max_tokens,
            }),
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            turns = request.transcript.len(),
            tools = request.tools.len(),
            "Sending chat request"
        );

        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 404 && error_text.contains("not found") {
                return Err(MatchError::ModelNotFound(self.model.clone()));
            }

            return Err(MatchError::model(format!(
                "Ollama API error ({}): {}",
                status, error_text
            )));
        }

        let response_text = response.text().await?;
        tracing::trace!(body = %response_text, "Chat response");

        let chat_response: ChatResponse = serde_json::from_str(&response_text)
            .map_err(|e| MatchError::model(format!("Failed to parse response: {}", e)))?;

        Ok(Self::to_model_reply(chat_response.message, request.transcript))
    }

    async fn is_available(&self) -> Result<bool> {
        let models = self.list_models().await?;
        Ok(models
            .iter()
            .any(|m| m == &self.model || m.split(':').next() == self.model.split(':').next()))
    }

    fn name(&self) -> &str {
        "ollama"
    }
}
