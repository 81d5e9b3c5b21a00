//! Orchestration loop state management
//!
//! Tracks the state machine of a run: querying the model, dispatching tool
//! calls, or finished with a result.

use crate::core::{OrchestrationResult, ToolCall};

/// Where the run currently is
#[derive(Debug, Clone, PartialEq)]
pub enum LoopState {
    /// Waiting to send the transcript to the model
    Querying,
    /// The model asked for these tool calls
    Dispatching(Vec<ToolCall>),
    /// The run is over
    Terminal(OrchestrationResult),
}

/// State of one orchestration run
#[derive(Debug, Clone)]
pub struct RunState {
    /// Model queries issued so far
    pub turn: usize,
    /// Maximum allowed model queries
    pub max_turns: usize,
    /// Current state machine position
    pub state: LoopState,
}

impl RunState {
    /// Create a new run state with the given budget
    pub fn new(max_turns: usize) -> Self {
        Self {
            turn: 0,
            max_turns,
            state: LoopState::Querying,
        }
    }

    /// Whether another step may run
    pub fn should_continue(&self) -> bool {
        match self.state {
            LoopState::Terminal(_) => false,
            // Pending tool calls are always dispatched, even on the last turn
            LoopState::Dispatching(_) => true,
            LoopState::Querying => self.turn < self.max_turns,
        }
    }

    /// Record that a model query was issued
    pub fn next_turn(&mut self) {
        self.turn += 1;
    }

    /// Move to a terminal state, stamping the turn count
    pub fn finish(&mut self, result: OrchestrationResult) {
        self.state = LoopState::Terminal(result.with_turns(self.turn));
    }

    /// Whether the run has a result
    pub fn is_terminal(&self) -> bool {
        matches!(self.state, LoopState::Terminal(_))
    }

    /// Take the result out of a terminal state
    pub fn into_result(self) -> Option<OrchestrationResult> {
        match self.state {
            LoopState::Terminal(result) => Some(result),
            _ => None,
        }
    }
}
