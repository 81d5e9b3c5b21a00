//! Search tools
//!
//! Look people up by skill, interest or preferred role, or list everyone.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::core::{MatchError, ParamType, Result, ToolDeclaration, ToolOutput, ToolParameter};
use crate::directory::{PeopleDirectory, Person};
use crate::tools::traits::Tool;

fn required_string(arguments: &serde_json::Value, key: &str) -> Result<String> {
    arguments
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| MatchError::invalid_argument(format!("missing required '{}'", key)))
}

fn profile_summary(person: &Person) -> serde_json::Value {
    json!({
        "name": person.name,
        "skills": person.skills,
        "interests": person.interests,
        "experience_level": person.experience_level,
    })
}

/// Tool for finding people with a specific skill
pub struct SearchBySkillTool {
    directory: Arc<PeopleDirectory>,
}

impl SearchBySkillTool {
    /// Create a new skill search tool
    pub fn new(directory: Arc<PeopleDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for SearchBySkillTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "search_people_by_skill",
            "Search for people with a specific skill",
        )
        .param(ToolParameter::required(
            "skill",
            ParamType::String,
            "Skill to look for, e.g. Backend or Python",
        ))
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput> {
        let skill = required_string(arguments, "skill")?;
        let matches: Vec<_> = self
            .directory
            .with_skill(&skill)
            .into_iter()
            .map(profile_summary)
            .collect();
        Ok(ToolOutput::Structured(matches.into()))
    }
}

/// Tool for finding people interested in a topic
pub struct SearchByInterestTool {
    directory: Arc<PeopleDirectory>,
}

impl SearchByInterestTool {
    /// Create a new interest search tool
    pub fn new(directory: Arc<PeopleDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for SearchByInterestTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "search_people_by_interest",
            "Search for people interested in a specific topic",
        )
        .param(ToolParameter::required(
            "interest",
            ParamType::String,
            "Topic of interest, e.g. Healthcare",
        ))
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput> {
        let interest = required_string(arguments, "interest")?;
        let matches: Vec<_> = self
            .directory
            .with_interest(&interest)
            .into_iter()
            .map(profile_summary)
            .collect();
        Ok(ToolOutput::Structured(matches.into()))
    }
}

/// Tool for finding people who want a specific role
pub struct SearchByRoleTool {
    directory: Arc<PeopleDirectory>,
}

impl SearchByRoleTool {
    /// Create a new role search tool
    pub fn new(directory: Arc<PeopleDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for SearchByRoleTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new(
            "search_people_by_role",
            "Search for people interested in a specific role",
        )
        .param(ToolParameter::required(
            "role",
            ParamType::String,
            "Preferred role, e.g. DevOps Engineer",
        ))
    }

    async fn invoke(&self, arguments: &serde_json::Value) -> Result<ToolOutput> {
        let role = required_string(arguments, "role")?;
        let matches: Vec<_> = self
            .directory
            .with_role(&role)
            .into_iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "role_preferences": p.role_preferences,
                    "experience_level": p.experience_level,
                    "skills": p.skills,
                })
            })
            .collect();
        Ok(ToolOutput::Structured(matches.into()))
    }
}

/// Tool that lists everyone in the directory
pub struct GetAllPeopleTool {
    directory: Arc<PeopleDirectory>,
}

impl GetAllPeopleTool {
    /// Create a new listing tool
    pub fn new(directory: Arc<PeopleDirectory>) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl Tool for GetAllPeopleTool {
    fn declaration(&self) -> ToolDeclaration {
        ToolDeclaration::new("get_all_people", "Get all people in the database")
    }

    async fn invoke(&self, _arguments: &serde_json::Value) -> Result<ToolOutput> {
        let people: Vec<_> = self
            .directory
            .all()
            .iter()
            .map(|p| {
                json!({
                    "id": p.id,
                    "name": p.name,
                    "skills": p.skills,
                    "interests": p.interests,
                    "experience_level": p.experience_level,
                    "role_preferences": p.role_preferences,
                })
            })
            .collect();
        Ok(ToolOutput::Structured(people.into()))
    }
}
