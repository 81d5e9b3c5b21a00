//! Conversation transcript for a single orchestration run
//!
//! Append-only: turns are never removed or rewritten, so the transcript sent
//! to the model is always the complete history of the run.

use crate::core::{ToolCall, ToolResult, Turn};

/// Ordered transcript of user, assistant and tool-result turns
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user turn
    pub fn add_user(&mut self, text: impl Into<String>) {
        self.push(Turn::User { text: text.into() });
    }

    /// Add an assistant turn
    pub fn add_assistant(&mut self, text: impl Into<String>, tool_calls: Vec<ToolCall>) {
        self.push(Turn::Assistant {
            text: text.into(),
            tool_calls,
        });
    }

    /// Add the result of one tool call
    pub fn add_tool_result(&mut self, result: ToolResult) {
        self.push(Turn::ToolResult {
            call_id: result.call_id,
            tool_name: result.tool_name,
            payload: result.output,
        });
    }

    /// Append any turn
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns, oldest first
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Get turn count
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
