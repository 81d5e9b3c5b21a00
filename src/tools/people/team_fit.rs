//! Team fit tool
//!
//! Summarizes what a group of people would bring to a team.

use std::sync::Arc;

use async_trait::async_trait;

use crate::core::{MatchError, ParamType, Result, ToolDeclaration, ToolOutput, ToolParameter};
use crate::directory::PeopleDirectory;
use crate::store::split_list;
use crate::tools::traits::Tool;

/// Tool for analyzing how a group fits together
pub struct CalculateTeamFitTool {
    directory: Arc<PeopleDirectory>,
}

/// Push values not yet seen, keeping first-seen order
fn extend_unique<'a>(target: &mut Vec<&'a str>, values: impl IntoIterator<Item = &'a str>) {
    for v in values {
        if !target.contains(&v) {
            target.push(v);
        }
    }
}

impl CalculateTeamFitTool {
    /// Create a new team fit tool
    pub fn new(directory: Arc<PeopleDirectory>) -> Self {
        Self { directory }
    }

    /// Build the composition summary for the named people
    pub fn analyze(&self, names: &[String]) -> String {
        let selected: Vec<_> = self
            .directory
            .all()
            .iter()
            .filter(|p| names.iter().any(|n| n == &p.name))
            .collect();

        if selected.is_empty() {
            return "No matching people found".to_string();
        }

        let mut skills = Vec::new();
        let mut interests = Vec::new();
        let mut roles = Vec::new();
        let mut levels: Vec<String> = Vec::new();

        for person in &selected {
            extend_unique(&mut skills, person.skills.iter().map(String::as_str));
            extend_unique(&mut interests, person.interests.iter().map(String::as_str));
            extend_unique(&mut roles, person.role_preferences.iter().map(String::as_str));
            let level = person.experience_level.to_string();
            if !levels.contains(&level) {
                levels.push(level);
            }
        }

        let members: Vec<&str> = selected.iter().map(|p| p.name.as_str()).collect();

        format!(
            "Team Composition Analysis:\n\
             - Members: {}\n\
             - Combined Skills: {}\n\
             - Shared Interests: {}\n\
             - Experience Levels: {}\n\
             - Roles Covered: {}\n",
            members.join(", "),
            skills.join(", "),
            interests.join(", "),
            levels.join(", "),
            roles.join(", "),
        )
    }
}

#[async_trait]
impl Tool for CalculateTeamFitTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "calculate_team_fit",
            "Calculate how well a group of people fit together based on preferences",
        )
        .param(ToolParameter::required(
            "people_names",
            ParamType::StringList,
            "Exact names of the people to evaluate",
        ))
        .param(ToolParameter::optional(
            "preferences",
            ParamType::String,
            "What the team is looking for",
        ))
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput> {
        // An array, or one comma-separated string
        let names: Vec<String> = match arguments.get("people_names") {
            Some(serde_json::Value::Array(values)) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            Some(serde_json::Value::String(joined)) => split_list(joined),
            _ => {
                return Err(MatchError::invalid_argument(
                    "missing required 'people_names'",
                ))
            }
        };

        Ok(ToolOutput::Text(self.analyze(&names)))
    }
}
