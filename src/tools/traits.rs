//! Tool trait - a named, schema-declared capability the model can call

use async_trait::async_trait;

use crate::core::{Result, ToolDeclaration, ToolOutput};

/// A callable tool.
///
/// Invocation must be a pure function of its arguments: tools may read from
/// shared collaborators but must not mutate state visible outside the call.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name, description and parameter schema
    fn declaration(&self) -> ToolDeclaration;

    /// Run the tool with the model-supplied arguments
    async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput>;
}
