//! Agent module - orchestration and conversation management
//!
//! Contains the loop that coordinates model calls and tool execution.

pub mod conversation;
pub mod fallback;
pub mod loop_state;
pub mod matcher;
pub mod orchestrator;
pub mod prompt;

pub use conversation::Conversation;
pub use fallback::{FallbackExtractor, NO_RESULT_MESSAGE};
pub use loop_state::{LoopState, RunState};
pub use matcher::Agent;
pub use orchestrator::{LoopSettings, Orchestrator};
pub use prompt::build_seed_prompt;
