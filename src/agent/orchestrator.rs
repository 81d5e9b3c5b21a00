//! Orchestration loop
//!
//! Drives the model through the registered tools until it gives an answer
//! or the turn budget runs out. Each run walks an explicit state machine:
//!
//! - `Querying`: send the transcript to the model and record its reply
//! - `Dispatching`: run the requested tools and record their results
//! - `Terminal`: the run has produced its result
//!
//! A run never returns an error. Model failures, timeouts and persistently
//! invalid tool requests all end in an unsuccessful result with a message.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::agent::conversation::Conversation;
use crate::agent::fallback::{is_substantive, FallbackExtractor};
use crate::agent::loop_state::{LoopState, RunState};
use crate::agent::prompt::build_seed_prompt;
use crate::core::{
    Config, MatchError, ModelReply, OrchestrationResult, ProfileRecord, Result, ToolCall,
    ToolDefinition, ToolResult,
};
use crate::llm::{ModelClient, ModelRequest};
use crate::tools::ToolRegistry;

/// Budget and thresholds for a run
#[derive(Debug, Clone)]
pub struct LoopSettings {
    /// Maximum model queries per run
    pub max_turns: usize,
    /// Answers need more than this many non-whitespace characters
    pub min_content_chars: usize,
    /// Timeout for one model query
    pub model_timeout: Duration,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            max_turns: 3,
            min_content_chars: 10,
            model_timeout: Duration::from_secs(90),
        }
    }
}

impl LoopSettings {
    /// Take loop settings from the agent configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_turns: config.agent.max_turns,
            min_content_chars: config.agent.min_content_chars,
            model_timeout: config.model_timeout(),
        }
    }
}

/// Runs the query/dispatch state machine for one profile at a time
pub struct Orchestrator {
    /// Model client, shared across runs
    model: Arc<dyn ModelClient>,
    /// Tool registry (wrapped in Arc for parallel execution)
    tools: Arc<ToolRegistry>,
    settings: LoopSettings,
}

impl Orchestrator {
    /// Create an orchestrator over a shared model and registry
    pub fn new(
        model: Arc<dyn ModelClient>,
        tools: Arc<ToolRegistry>,
        settings: LoopSettings,
    ) -> Self {
        Self {
            model,
            tools,
            settings,
        }
    }

    /// Get the tool registry
    pub fn tools(&self) -> &Arc<ToolRegistry> {
        &self.tools
    }

    /// Find matches for a profile
    pub async fn run(&self, profile: &ProfileRecord) -> OrchestrationResult {
        let mut conversation = Conversation::new();
        conversation.add_user(build_seed_prompt(profile));

        let definitions = self.tools.definitions();
        let fallback = FallbackExtractor::new(self.settings.min_content_chars);
        let mut run = RunState::new(self.settings.max_turns);

        info!(
            profile = %profile.name,
            max_turns = run.max_turns,
            tools = definitions.len(),
            "Starting matching run"
        );

        while run.should_continue() {
            match std::mem::replace(&mut run.state, LoopState::Querying) {
                LoopState::Querying => {
                    run.next_turn();
                    debug!(turn = run.turn, "Querying model");

                    match self.query(&conversation, &definitions).await {
                        Ok(reply) => self.record_reply(reply, &mut conversation, &mut run),
                        Err(e) => {
                            warn!(turn = run.turn, "Model query failed: {}", e);
                            run.finish(OrchestrationResult::failure(e.to_string()));
                        }
                    }
                }
                LoopState::Dispatching(calls) => {
                    debug!(turn = run.turn, calls = calls.len(), "Dispatching tools");

                    let results = self.dispatch(&calls).await;
                    let any_resolved = results.iter().any(|r| r.resolved);

                    for result in results {
                        debug!(
                            tool = %result.tool_name,
                            call_id = %result.call_id,
                            success = result.success,
                            "Tool finished"
                        );
                        conversation.add_tool_result(result);
                    }

                    // A name that did not resolve will not resolve on replay either
                    if !any_resolved {
                        warn!(turn = run.turn, "No requested tool exists, stopping");
                        run.finish(fallback.extract(conversation.turns()));
                    }
                }
                terminal @ LoopState::Terminal(_) => run.state = terminal,
            }
        }

        if !run.is_terminal() {
            info!(turns = run.turn, "Turn budget exhausted, using fallback");
            run.finish(fallback.extract(conversation.turns()));
        }

        let result = run
            .into_result()
            .unwrap_or_else(|| OrchestrationResult::failure(crate::agent::NO_RESULT_MESSAGE));

        info!(
            success = result.success,
            turns = result.turns_used,
            transcript = conversation.len(),
            "Matching run complete"
        );
        result
    }

    /// One model query, bounded by the configured timeout
    async fn query(
        &self,
        conversation: &Conversation,
        definitions: &[ToolDefinition],
    ) -> Result<ModelReply> {
        let request = ModelRequest::new(conversation.turns(), definitions);
        let timeout = self.settings.model_timeout;

        match tokio::time::timeout(timeout, self.model.complete(request)).await {
            Ok(reply) => reply,
            Err(_) => Err(MatchError::ModelTimeout(timeout.as_secs())),
        }
    }

    /// Append the reply and pick the next state
    fn record_reply(&self, reply: ModelReply, conversation: &mut Conversation, run: &mut RunState) {
        match reply {
            ModelReply::Answer(text) => {
                conversation.add_assistant(text.clone(), Vec::new());
                if is_substantive(&text, self.settings.min_content_chars) {
                    run.finish(OrchestrationResult::success(text));
                } else {
                    debug!(turn = run.turn, "Answer too short, staying in querying");
                }
            }
            ModelReply::ToolCalls { text, calls } => {
                conversation.add_assistant(text, calls.clone());
                run.state = LoopState::Dispatching(calls);
            }
        }
    }

    /// Invoke a batch of calls concurrently.
    ///
    /// Results come back in request order regardless of completion order.
    async fn dispatch(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut set = JoinSet::new();

        for (index, call) in calls.iter().cloned().enumerate() {
            let tools = Arc::clone(&self.tools);
            set.spawn(async move {
                let result = tools.invoke(&call).await;
                (index, result)
            });
        }

        let mut slots: Vec<Option<ToolResult>> = vec![None; calls.len()];
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => warn!("Tool task failed: {}", e),
            }
        }

        slots
            .into_iter()
            .zip(calls)
            .map(|(slot, call)| {
                slot.unwrap_or_else(|| ToolResult::failure(call, "tool task panicked"))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ParamType, ToolDeclaration, ToolOutput, ToolParameter, Turn};
    use crate::tools::Tool;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Replays scripted replies and records every transcript it was sent
    struct ScriptedModel {
        replies: Mutex<Vec<Result<ModelReply>>>,
        seen: Mutex<Vec<Vec<Turn>>>,
    }

    impl ScriptedModel {
        fn new(replies: Vec<Result<ModelReply>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ModelClient for ScriptedModel {
        async fn complete(&self, request: ModelRequest<'_>) -> Result<ModelReply> {
            self.seen.lock().unwrap().push(request.transcript.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or_else(|| Ok(ModelReply::Answer(String::new())))
        }

        async fn is_available(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    struct SlowModel;

    #[async_trait]
    impl ModelClient for SlowModel {
        async fn complete(&self, _request: ModelRequest<'_>) -> Result<ModelReply> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ModelReply::Answer("too late to matter".into()))
        }

        async fn is_available(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "slow"
        }
    }

    struct CountingTool {
        invocations: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Tool for CountingTool {
        fn declaration(&self) -> ToolDeclaration {
            ToolDeclaration::new("lookup", "Look something up").param(ToolParameter::required(
                "q",
                ParamType::String,
                "Query",
            ))
        }

        async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput> {
            self.invocations.fetch_add(1, Ordering::SeqCst);
            Ok(ToolOutput::Structured(serde_json::json!([
                {"name": "Ana", "q": arguments["q"]}
            ])))
        }
    }

    fn call(id: &str, name: &str) -> ToolCall {
        ToolCall::new(id, name, serde_json::json!({"q": "x"}))
    }

    fn orchestrator(model: Arc<dyn ModelClient>) -> (Orchestrator, Arc<AtomicUsize>) {
        let invocations = Arc::new(AtomicUsize::new(0));
        let mut registry = ToolRegistry::new();
        registry
            .register(CountingTool {
                invocations: invocations.clone(),
            })
            .unwrap();
        let orch = Orchestrator::new(model, Arc::new(registry), LoopSettings::default());
        (orch, invocations)
    }

    #[tokio::test]
    async fn test_single_turn_answer() {
        let model = Arc::new(ScriptedModel::new(vec![Ok(ModelReply::Answer(
            "Ana (Go) - strong backend".into(),
        ))]));
        let (orch, invocations) = orchestrator(model.clone());

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(result.success);
        assert_eq!(result.text, "Ana (Go) - strong backend");
        assert_eq!(result.turns_used, 1);
        assert_eq!(model.calls(), 1);
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_tool_then_answer() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelReply::ToolCalls {
                text: String::new(),
                calls: vec![call("c0", "lookup")],
            }),
            Ok(ModelReply::Answer("Ana - shares your interests".into())),
        ]));
        let (orch, invocations) = orchestrator(model.clone());

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(result.success);
        assert_eq!(result.turns_used, 2);
        assert_eq!(invocations.load(Ordering::SeqCst), 1);

        // second query saw seed, assistant, tool result
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[1].len(), 3);
        assert!(matches!(&seen[1][2], Turn::ToolResult { call_id, .. } if call_id == "c0"));
    }

    #[tokio::test]
    async fn test_all_unresolved_stops_without_requery() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelReply::ToolCalls {
                text: String::new(),
                calls: vec![call("c0", "ghost"), call("c1", "phantom")],
            }),
            Ok(ModelReply::Answer("should never be asked".into())),
        ]));
        let (orch, invocations) = orchestrator(model.clone());

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(!result.success);
        assert_eq!(model.calls(), 1);
        assert_eq!(invocations.load(Ordering::SeqCst), 0);
        // the not-found payload is the most recent substantive content
        assert!(result.text.contains("tool not found"));
    }

    #[tokio::test]
    async fn test_partial_resolution_continues() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelReply::ToolCalls {
                text: String::new(),
                calls: vec![call("c0", "ghost"), call("c1", "lookup")],
            }),
            Ok(ModelReply::Answer("Ana is the best match here".into())),
        ]));
        let (orch, invocations) = orchestrator(model.clone());

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(result.success);
        assert_eq!(model.calls(), 2);
        assert_eq!(invocations.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_short_answers_exhaust_budget() {
        let model = Arc::new(ScriptedModel::new(vec![
            Ok(ModelReply::Answer("ok".into())),
            Ok(ModelReply::Answer("".into())),
            Ok(ModelReply::Answer("hmm".into())),
            Ok(ModelReply::Answer("never reached, budget is three".into())),
        ]));
        let (orch, _) = orchestrator(model.clone());

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(!result.success);
        assert_eq!(result.text, crate::agent::NO_RESULT_MESSAGE);
        assert_eq!(model.calls(), 3);
        assert_eq!(result.turns_used, 3);
    }

    #[tokio::test]
    async fn test_model_error_is_terminal() {
        let model = Arc::new(ScriptedModel::new(vec![Err(MatchError::model(
            "connection refused",
        ))]));
        let (orch, _) = orchestrator(model.clone());

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(!result.success);
        assert!(result.text.contains("connection refused"));
        assert_eq!(model.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_model_timeout_is_terminal() {
        let registry = Arc::new(ToolRegistry::new());
        let settings = LoopSettings {
            model_timeout: Duration::from_secs(5),
            ..Default::default()
        };
        let orch = Orchestrator::new(Arc::new(SlowModel), registry, settings);

        let result = orch.run(&ProfileRecord::new("Sarah")).await;
        assert!(!result.success);
        assert_eq!(result.text, "Model call timed out after 5s");
        assert_eq!(result.turns_used, 1);
    }
}
