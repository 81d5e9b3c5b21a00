//! Tools module - Tool implementations for the agent
//!
//! Contains the tool trait, the team-matching tools, and the tool registry.

pub mod people;
pub mod registry;
pub mod traits;

pub use registry::{Resolution, ToolRegistry};
pub use traits::Tool;
