//! Shared types used across Matchmaker modules
//!
//! Contains the profile record, transcript turns, tool declarations and the
//! result of an orchestration run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::MatchError;

/// Self-reported experience of a hackathon participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperienceLevel::Beginner => write!(f, "beginner"),
            ExperienceLevel::Intermediate => write!(f, "intermediate"),
            ExperienceLevel::Advanced => write!(f, "advanced"),
        }
    }
}

impl FromStr for ExperienceLevel {
    type Err = MatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(ExperienceLevel::Beginner),
            "intermediate" => Ok(ExperienceLevel::Intermediate),
            "advanced" => Ok(ExperienceLevel::Advanced),
            other => Err(MatchError::invalid_argument(format!(
                "unknown experience level '{}' (expected beginner, intermediate or advanced)",
                other
            ))),
        }
    }
}

impl<'de> Deserialize<'de> for ExperienceLevel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// The person we are finding teammates for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ProfileRecord {
    pub name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default, alias = "experience_level")]
    pub experience: ExperienceLevel,
    #[serde(default, alias = "role_preferences")]
    pub roles: Vec<String>,
    /// What they are looking for in a team
    #[serde(default, alias = "preferences")]
    pub goal: String,
}

impl ProfileRecord {
    /// Create a profile with only a name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// A tool call made by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier used to correlate the result with this request
    pub id: String,
    /// Name of the tool to invoke
    pub name: String,
    /// JSON arguments for the tool
    pub arguments: serde_json::Value,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: serde_json::Value,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// Primitive type of a tool parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Integer,
    Number,
    Boolean,
    StringList,
}

impl ParamType {
    fn json_schema(&self) -> serde_json::Value {
        match self {
            ParamType::String => serde_json::json!({ "type": "string" }),
            ParamType::Integer => serde_json::json!({ "type": "integer" }),
            ParamType::Number => serde_json::json!({ "type": "number" }),
            ParamType::Boolean => serde_json::json!({ "type": "boolean" }),
            ParamType::StringList => {
                serde_json::json!({ "type": "array", "items": { "type": "string" } })
            }
        }
    }
}

/// One named parameter of a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    pub name: String,
    pub param_type: ParamType,
    pub description: String,
    pub required: bool,
}

impl ToolParameter {
    /// A required parameter
    pub fn required(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: description.into(),
            required: true,
        }
    }

    /// An optional parameter
    pub fn optional(
        name: impl Into<String>,
        param_type: ParamType,
        description: impl Into<String>,
    ) -> Self {
        Self {
            required: false,
            ..Self::required(name, param_type, description)
        }
    }
}

/// Name, description and parameter schema of a callable tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Vec<ToolParameter>,
}

impl ToolDeclaration {
    /// Create a declaration with no parameters
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    /// Add a parameter
    pub fn param(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Render as a function-calling definition for the model
    pub fn to_definition(&self) -> ToolDefinition {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for p in &self.parameters {
            let mut schema = p.param_type.json_schema();
            if let Some(obj) = schema.as_object_mut() {
                obj.insert("description".into(), p.description.clone().into());
            }
            properties.insert(p.name.clone(), schema);
            if p.required {
                required.push(serde_json::Value::String(p.name.clone()));
            }
        }

        ToolDefinition::function(
            &self.name,
            &self.description,
            serde_json::json!({
                "type": "object",
                "properties": properties,
                "required": required
            }),
        )
    }
}

/// Definition of a tool that can be called by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Type of tool (always "function" for now)
    #[serde(rename = "type")]
    pub tool_type: String,
    /// Function details
    pub function: FunctionDefinition,
}

/// Function definition within a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDefinition {
    /// Name of the function
    pub name: String,
    /// Description of what the function does
    pub description: String,
    /// JSON Schema for the parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new function tool definition
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// Raw value returned by a tool
#[derive(Debug, Clone, PartialEq)]
pub enum ToolOutput {
    /// Scalar text, inserted into the transcript as-is
    Text(String),
    /// Records or mappings, serialized before insertion
    Structured(serde_json::Value),
}

impl ToolOutput {
    /// Canonical text encoding used in the transcript
    pub fn into_text(self) -> String {
        match self {
            ToolOutput::Text(text) => text,
            ToolOutput::Structured(serde_json::Value::String(text)) => text,
            // serde_json::Map is ordered by key, so this is stable
            ToolOutput::Structured(value) => value.to_string(),
        }
    }
}

/// Result of invoking one tool call through the registry
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Id of the originating call
    pub call_id: String,
    /// Name of the tool that was requested
    pub tool_name: String,
    /// Whether the name resolved to a registered tool
    pub resolved: bool,
    /// Whether the execution was successful
    pub success: bool,
    /// Output from the tool
    pub output: String,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(call: &ToolCall, output: impl Into<String>) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            resolved: true,
            success: true,
            output: output.into(),
        }
    }

    /// Create a failed result for a tool that exists
    pub fn failure(call: &ToolCall, error: impl Into<String>) -> Self {
        Self {
            success: false,
            ..Self::success(call, error)
        }
    }

    /// Create the structured "tool not found" result
    pub fn not_found(call: &ToolCall) -> Self {
        Self {
            call_id: call.id.clone(),
            tool_name: call.name.clone(),
            resolved: false,
            success: false,
            output: serde_json::json!({
                "error": "tool not found",
                "tool": call.name,
            })
            .to_string(),
        }
    }
}

/// One entry of the conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum Turn {
    User {
        text: String,
    },
    Assistant {
        text: String,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    ToolResult {
        call_id: String,
        tool_name: String,
        payload: String,
    },
}

impl Turn {
    /// Textual content of the turn
    pub fn text(&self) -> &str {
        match self {
            Turn::User { text } | Turn::Assistant { text, .. } => text,
            Turn::ToolResult { payload, .. } => payload,
        }
    }

    /// Role label as used on the wire
    pub fn role(&self) -> &'static str {
        match self {
            Turn::User { .. } => "user",
            Turn::Assistant { .. } => "assistant",
            Turn::ToolResult { .. } => "tool",
        }
    }
}

/// What the model answered to one request
#[derive(Debug, Clone, PartialEq)]
pub enum ModelReply {
    /// Natural-language answer with no tool requests
    Answer(String),
    /// One or more tool requests, possibly with accompanying text
    ToolCalls { text: String, calls: Vec<ToolCall> },
}

impl ModelReply {
    /// Build a reply from text and a possibly-empty list of calls
    pub fn from_parts(text: String, calls: Vec<ToolCall>) -> Self {
        if calls.is_empty() {
            ModelReply::Answer(text)
        } else {
            ModelReply::ToolCalls { text, calls }
        }
    }
}

/// Final output of one orchestration run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrchestrationResult {
    pub text: String,
    pub success: bool,
    /// Number of model queries issued
    #[serde(default)]
    pub turns_used: usize,
}

impl OrchestrationResult {
    /// An accepted answer
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
            turns_used: 0,
        }
    }

    /// A failed run with a human-readable message
    pub fn failure(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: false,
            turns_used: 0,
        }
    }

    /// Record how many model queries were issued
    pub fn with_turns(mut self, turns: usize) -> Self {
        self.turns_used = turns;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_experience_parse() {
        assert_eq!(
            "Advanced".parse::<ExperienceLevel>().unwrap(),
            ExperienceLevel::Advanced
        );
        assert_eq!(
            " beginner ".parse::<ExperienceLevel>().unwrap(),
            ExperienceLevel::Beginner
        );
        assert!("guru".parse::<ExperienceLevel>().is_err());
    }

    #[test]
    fn test_experience_deserialize_ignores_case() {
        let profile: ProfileRecord =
            serde_json::from_str(r#"{"name": "Sarah", "experience_level": "Advanced"}"#).unwrap();
        assert_eq!(profile.experience, ExperienceLevel::Advanced);

        let level: ExperienceLevel = serde_json::from_str(r#""INTERMEDIATE""#).unwrap();
        assert_eq!(level, ExperienceLevel::Intermediate);
        assert_eq!(serde_json::to_string(&level).unwrap(), r#""intermediate""#);

        assert!(serde_json::from_str::<ExperienceLevel>(r#""guru""#).is_err());
    }

    #[test]
    fn test_profile_accepts_legacy_field_names() {
        let profile: ProfileRecord = serde_json::from_str(
            r#"{
                "name": "Sarah",
                "skills": ["Python"],
                "experience_level": "advanced",
                "role_preferences": ["ML Engineer"],
                "preferences": "backend devs"
            }"#,
        )
        .unwrap();

        assert_eq!(profile.experience, ExperienceLevel::Advanced);
        assert_eq!(profile.roles, vec!["ML Engineer"]);
        assert_eq!(profile.goal, "backend devs");
        assert!(profile.interests.is_empty());
    }

    #[test]
    fn test_declaration_to_definition() {
        let decl = ToolDeclaration::new("calculate_team_fit", "Score a team")
            .param(ToolParameter::required(
                "people_names",
                ParamType::StringList,
                "Names",
            ))
            .param(ToolParameter::optional(
                "preferences",
                ParamType::String,
                "Goal",
            ));

        let def = decl.to_definition();
        assert_eq!(def.tool_type, "function");
        assert_eq!(def.function.name, "calculate_team_fit");

        let params = &def.function.parameters;
        assert_eq!(params["properties"]["people_names"]["type"], "array");
        assert_eq!(params["properties"]["preferences"]["type"], "string");
        assert_eq!(params["required"], serde_json::json!(["people_names"]));
    }

    #[test]
    fn test_tool_output_encoding() {
        let text = ToolOutput::Text("No matching people found".into()).into_text();
        assert_eq!(text, "No matching people found");

        let structured = ToolOutput::Structured(serde_json::json!([
            {"name": "Ana", "skills": ["Go"]}
        ]))
        .into_text();
        assert_eq!(structured, r#"[{"name":"Ana","skills":["Go"]}]"#);
    }

    #[test]
    fn test_not_found_result() {
        let call = ToolCall::new("call_0", "summon_wizard", serde_json::json!({}));
        let result = ToolResult::not_found(&call);
        assert!(!result.resolved);
        assert!(!result.success);
        assert_eq!(result.call_id, "call_0");
        assert!(result.output.contains("tool not found"));
    }

    #[test]
    fn test_model_reply_from_parts() {
        assert_eq!(
            ModelReply::from_parts("hi".into(), vec![]),
            ModelReply::Answer("hi".into())
        );
        let call = ToolCall::new("c", "t", serde_json::json!({}));
        assert!(matches!(
            ModelReply::from_parts(String::new(), vec![call]),
            ModelReply::ToolCalls { .. }
        ));
    }
}
