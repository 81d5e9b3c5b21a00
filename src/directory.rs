//! People directory - the shared dataset behind the search tools
//!
//! Loaded once from a JSON export and handed to tools as `Arc<PeopleDirectory>`.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ExperienceLevel, MatchError, Result};

/// Where a person is based
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Location {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
}

/// A candidate teammate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: u32,
    pub name: String,
    #[serde(default = "unknown")]
    pub title: String,
    #[serde(default = "unknown")]
    pub company: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub interests: Vec<String>,
    #[serde(default)]
    pub experience_level: ExperienceLevel,
    #[serde(default)]
    pub role_preferences: Vec<String>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub linkedin: String,
    #[serde(default)]
    pub headline: String,
}

fn unknown() -> String {
    "Unknown".to_string()
}

fn contains_ignore_case(values: &[String], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    values.iter().any(|v| v.to_lowercase() == needle)
}

/// In-memory, read-only collection of people
#[derive(Debug, Clone, Default)]
pub struct PeopleDirectory {
    people: Vec<Person>,
}

impl PeopleDirectory {
    /// Build a directory from records, filling default skills and interests
    pub fn new(people: Vec<Person>) -> Self {
        let people = people
            .into_iter()
            .map(|mut p| {
                if p.skills.is_empty() {
                    p.skills.push("General".to_string());
                }
                if p.interests.is_empty() {
                    p.interests.push("Technology".to_string());
                }
                p
            })
            .collect();
        Self { people }
    }

    /// Parse a JSON array of people
    pub fn from_json_str(json: &str) -> Result<Self> {
        let people: Vec<Person> = serde_json::from_str(json)
            .map_err(|e| MatchError::directory(format!("Invalid people data: {}", e)))?;
        Ok(Self::new(people))
    }

    /// Load the directory from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MatchError::directory(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let directory = Self::from_json_str(&content)?;
        tracing::info!(count = directory.len(), path = %path.display(), "Loaded people directory");
        Ok(directory)
    }

    /// Get all people
    pub fn all(&self) -> &[Person] {
        &self.people
    }

    /// Number of people
    pub fn len(&self) -> usize {
        self.people.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    /// Get person by id
    pub fn by_id(&self, id: u32) -> Option<&Person> {
        self.people.iter().find(|p| p.id == id)
    }

    /// Get person by name, ignoring case
    pub fn by_name(&self, name: &str) -> Option<&Person> {
        let name = name.to_lowercase();
        self.people.iter().find(|p| p.name.to_lowercase() == name)
    }

    /// People listing a skill
    pub fn with_skill(&self, skill: &str) -> Vec<&Person> {
        self.people
            .iter()
            .filter(|p| contains_ignore_case(&p.skills, skill))
            .collect()
    }

    /// People listing an interest
    pub fn with_interest(&self, interest: &str) -> Vec<&Person> {
        self.people
            .iter()
            .filter(|p| contains_ignore_case(&p.interests, interest))
            .collect()
    }

    /// People preferring a role
    pub fn with_role(&self, role: &str) -> Vec<&Person> {
        self.people
            .iter()
            .filter(|p| contains_ignore_case(&p.role_preferences, role))
            .collect()
    }

    /// People whose company contains the given text
    pub fn by_company(&self, company: &str) -> Vec<&Person> {
        let company = company.to_lowercase();
        self.people
            .iter()
            .filter(|p| p.company.to_lowercase().contains(&company))
            .collect()
    }

    /// People matching a city, or else a state
    pub fn by_location(&self, city: Option<&str>, state: Option<&str>) -> Vec<&Person> {
        let city = city.map(str::to_lowercase);
        let state = state.map(str::to_lowercase);

        self.people
            .iter()
            .filter(|p| {
                let in_city = city
                    .as_deref()
                    .is_some_and(|c| p.location.city.to_lowercase().contains(c));
                let in_state = state
                    .as_deref()
                    .is_some_and(|s| p.location.state.to_lowercase().contains(s));
                in_city || in_state
            })
            .collect()
    }

    /// Readable multi-line summary of a person
    pub fn format_person(person: &Person) -> String {
        format!(
            "Name: {}\nTitle: {}\nCompany: {}\nLocation: {}, {}\nSkills: {}\nInterests: {}\nExperience: {}\n",
            person.name,
            person.title,
            person.company,
            person.location.city,
            person.location.state,
            person.skills.join(", "),
            person.interests.join(", "),
            person.experience_level,
        )
    }
}
