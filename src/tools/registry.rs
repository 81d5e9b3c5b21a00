//! Tool registry - manages and dispatches tool calls
//!
//! Central hub for registering tools and routing tool calls to handlers.

use std::collections::HashMap;
use std::sync::Arc;

use crate::core::{MatchError, Result, ToolCall, ToolDeclaration, ToolDefinition, ToolResult};
use crate::directory::PeopleDirectory;
use crate::tools::people::{
    CalculateTeamFitTool, GetAllPeopleTool, SearchByInterestTool, SearchByRoleTool,
    SearchBySkillTool,
};
use crate::tools::traits::Tool;

/// Outcome of looking up a tool by name
pub enum Resolution {
    /// The name is registered
    Found(Arc<dyn Tool>),
    /// No tool with that name
    NotFound,
}

impl Resolution {
    /// Whether the lookup succeeded
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }
}

struct RegisteredTool {
    declaration: ToolDeclaration,
    tool: Arc<dyn Tool>,
}

/// Registry of available tools
#[derive(Default)]
pub struct ToolRegistry {
    /// Tools in registration order
    tools: Vec<RegisteredTool>,
    /// Position of each tool by name
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    /// Create an empty tool registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry with the team-matching tools over a people directory
    pub fn with_people(directory: Arc<PeopleDirectory>) -> Result<Self> {
        let mut registry = Self::new();
        registry.register(SearchBySkillTool::new(directory.clone()))?;
        registry.register(SearchByInterestTool::new(directory.clone()))?;
        registry.register(SearchByRoleTool::new(directory.clone()))?;
        registry.register(GetAllPeopleTool::new(directory.clone()))?;
        registry.register(CalculateTeamFitTool::new(directory))?;
        Ok(registry)
    }

    /// Register a tool; fails if the name is already taken
    pub fn register<T: Tool + 'static>(&mut self, tool: T) -> Result<()> {
        self.register_shared(Arc::new(tool))
    }

    /// Register an already shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) -> Result<()> {
        let declaration = tool.declaration();
        let name = declaration.name.clone();

        if self.index.contains_key(&name) {
            return Err(MatchError::DuplicateTool(name));
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(RegisteredTool { declaration, tool });
        Ok(())
    }

    /// Look up a tool by name
    pub fn resolve(&self, name: &str) -> Resolution {
        match self.index.get(name) {
            Some(&i) => Resolution::Found(self.tools[i].tool.clone()),
            None => Resolution::NotFound,
        }
    }

    /// Get all tool declarations in registration order
    pub fn declarations(&self) -> Vec<&ToolDeclaration> {
        self.tools.iter().map(|t| &t.declaration).collect()
    }

    /// Get all tool definitions in the model's function-calling format
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.declarations()
            .into_iter()
            .map(ToolDeclaration::to_definition)
            .collect()
    }

    /// Get all tool names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.declarations()
            .into_iter()
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool call.
    ///
    /// Never fails: unknown names and tool errors become unsuccessful results
    /// so the loop can report them back to the model.
    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.resolve(&call.name) {
            Resolution::Found(tool) => tool,
            Resolution::NotFound => {
                let err = MatchError::UnknownTool(call.name.clone());
                tracing::warn!(call_id = %call.id, "{}", err);
                return ToolResult::not_found(call);
            }
        };

        match tool.invoke(&call.arguments).await {
            Ok(output) => ToolResult::success(call, output.into_text()),
            Err(e) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, "Tool failed: {}", e);
                ToolResult::failure(call, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ParamType, ToolOutput, ToolParameter};
    use async_trait::async_trait;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn declaration(&self) -> ToolDeclaration {
            ToolDeclaration::new("echo", "Echo the input back").param(ToolParameter::required(
                "text",
                ParamType::String,
                "Text to echo",
            ))
        }

        async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput> {
            arguments["text"]
                .as_str()
                .map(|s| ToolOutput::Text(s.to_string()))
                .ok_or_else(|| MatchError::invalid_argument("missing 'text'"))
        }
    }

    #[test]
    fn test_duplicate_registration_fails() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let err = registry.register(EchoTool).unwrap_err();
        assert!(matches!(err, MatchError::DuplicateTool(name) if name == "echo"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        assert!(registry.resolve("echo").is_found());
        assert!(!registry.resolve("missing").is_found());
    }

    #[tokio::test]
    async fn test_invoke_known_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let call = ToolCall::new("c1", "echo", serde_json::json!({"text": "hello"}));
        let result = registry.invoke(&call).await;
        assert!(result.resolved);
        assert!(result.success);
        assert_eq!(result.output, "hello");
        assert_eq!(result.call_id, "c1");
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool_is_structured() {
        let registry = ToolRegistry::new();
        let call = ToolCall::new("c1", "nope", serde_json::json!({}));
        let result = registry.invoke(&call).await;

        assert!(!result.resolved);
        assert!(!result.success);
        let payload: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(payload["error"], "tool not found");
        assert_eq!(payload["tool"], "nope");
    }

    #[tokio::test]
    async fn test_invoke_bad_arguments_is_resolved_failure() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool).unwrap();

        let call = ToolCall::new("c1", "echo", serde_json::json!({}));
        let result = registry.invoke(&call).await;
        assert!(result.resolved);
        assert!(!result.success);
        assert!(result.output.contains("missing 'text'"));
    }

    #[test]
    fn test_people_registry_order() {
        let registry = ToolRegistry::with_people(Arc::new(PeopleDirectory::default())).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "search_people_by_skill",
                "search_people_by_interest",
                "search_people_by_role",
                "get_all_people",
                "calculate_team_fit",
            ]
        );
        let definitions = registry.definitions();
        assert_eq!(definitions.len(), 5);
        assert_eq!(definitions[4].function.name, "calculate_team_fit");
    }
}
