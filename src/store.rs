//! Profile and match-history store
//!
//! Keeps each user's profile and the results of past matching runs in a
//! single JSON file. History entries expire after a configurable number of
//! days.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{ExperienceLevel, MatchError, ProfileRecord, Result};

/// A saved profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredProfile {
    #[serde(flatten)]
    pub profile: ProfileRecord,
    pub updated_at: DateTime<Utc>,
}

/// One past matching run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub timestamp: DateTime<Utc>,
    pub query: String,
    pub matches: String,
    #[serde(default)]
    pub success: bool,
}

/// A single-field change to a saved profile
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileUpdate {
    Skills(Vec<String>),
    Interests(Vec<String>),
    Experience(ExperienceLevel),
    Roles(Vec<String>),
    Goal(String),
}

impl ProfileUpdate {
    /// Parse a `field value` pair as typed in the REPL
    pub fn parse(field: &str, value: &str) -> Result<Self> {
        let list = || split_list(value);
        match field.to_lowercase().as_str() {
            "skills" => Ok(Self::Skills(list())),
            "interests" => Ok(Self::Interests(list())),
            "experience" | "level" => Ok(Self::Experience(value.parse()?)),
            "roles" => Ok(Self::Roles(list())),
            "goal" | "preferences" => Ok(Self::Goal(value.trim().to_string())),
            other => Err(MatchError::invalid_argument(format!(
                "unknown profile field '{}' (expected skills, interests, experience, roles or goal)",
                other
            ))),
        }
    }

    fn apply(self, profile: &mut ProfileRecord) {
        match self {
            Self::Skills(v) => profile.skills = v,
            Self::Interests(v) => profile.interests = v,
            Self::Experience(v) => profile.experience = v,
            Self::Roles(v) => profile.roles = v,
            Self::Goal(v) => profile.goal = v,
        }
    }
}

/// Split a comma-separated list, dropping empty entries
pub fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreData {
    #[serde(default)]
    profiles: BTreeMap<String, StoredProfile>,
    #[serde(default)]
    matches: BTreeMap<String, Vec<MatchRecord>>,
}

/// JSON-file backed store of profiles and match history
#[derive(Debug)]
pub struct ProfileStore {
    path: PathBuf,
    ttl: Duration,
    data: StoreData,
}

fn key(username: &str) -> String {
    username.trim().to_lowercase()
}

impl ProfileStore {
    /// Open a store, creating an empty one if the file does not exist yet
    pub fn open(path: impl Into<PathBuf>, ttl_days: i64) -> Result<Self> {
        let ttl = Duration::try_days(ttl_days)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                MatchError::store(format!("Invalid history TTL of {} days", ttl_days))
            })?;

        let path = path.into();
        let data = if path.exists() {
            let content = fs::read_to_string(&path)?;
            serde_json::from_str(&content).map_err(|e| {
                MatchError::store(format!("Corrupt store at {}: {}", path.display(), e))
            })?
        } else {
            StoreData::default()
        };

        let mut store = Self { path, ttl, data };
        store.prune(Utc::now());
        Ok(store)
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Oldest timestamp still kept
    fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.ttl).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let cutoff = self.cutoff(now);
        for history in self.data.matches.values_mut() {
            history.retain(|m| m.timestamp >= cutoff);
        }
        self.data.matches.retain(|_, history| !history.is_empty());
    }

    /// Save or replace a user's profile
    pub fn save_profile(&mut self, username: &str, profile: &ProfileRecord) -> Result<()> {
        self.data.profiles.insert(
            key(username),
            StoredProfile {
                profile: profile.clone(),
                updated_at: Utc::now(),
            },
        );
        self.persist()?;
        tracing::debug!(user = %key(username), "Saved profile");
        Ok(())
    }

    /// Get a user's profile
    pub fn get_profile(&self, username: &str) -> Option<&StoredProfile> {
        self.data.profiles.get(&key(username))
    }

    /// Change one field of a saved profile
    pub fn update_profile(&mut self, username: &str, update: ProfileUpdate) -> Result<()> {
        let stored = self
            .data
            .profiles
            .get_mut(&key(username))
            .ok_or_else(|| MatchError::store(format!("No profile for '{}'", username)))?;

        update.apply(&mut stored.profile);
        stored.updated_at = Utc::now();
        self.persist()
    }

    /// All usernames with a saved profile, sorted
    pub fn list_users(&self) -> Vec<&str> {
        self.data.profiles.keys().map(String::as_str).collect()
    }

    /// Delete a user's profile and match history; returns whether anything existed
    pub fn delete_user(&mut self, username: &str) -> Result<bool> {
        let k = key(username);
        let had_profile = self.data.profiles.remove(&k).is_some();
        let had_matches = self.data.matches.remove(&k).is_some();
        self.persist()?;
        Ok(had_profile || had_matches)
    }

    /// Append a matching result to a user's history
    pub fn save_match(
        &mut self,
        username: &str,
        matches: &str,
        query: &str,
        success: bool,
    ) -> Result<()> {
        self.save_match_at(username, matches, query, success, Utc::now())
    }

    fn save_match_at(
        &mut self,
        username: &str,
        matches: &str,
        query: &str,
        success: bool,
        timestamp: DateTime<Utc>,
    ) -> Result<()> {
        self.data
            .matches
            .entry(key(username))
            .or_default()
            .push(MatchRecord {
                timestamp,
                query: query.to_string(),
                matches: matches.to_string(),
                success,
            });
        self.prune(Utc::now());
        self.persist()
    }

    /// The most recent `limit` results, oldest first
    pub fn match_history(&self, username: &str, limit: usize) -> Vec<&MatchRecord> {
        let cutoff = self.cutoff(Utc::now());
        let live: Vec<&MatchRecord> = self
            .data
            .matches
            .get(&key(username))
            .map(|h| h.iter().filter(|m| m.timestamp >= cutoff).collect())
            .unwrap_or_default();

        let skip = live.len().saturating_sub(limit);
        live.into_iter().skip(skip).collect()
    }

    /// The most recent result
    pub fn latest_match(&self, username: &str) -> Option<&MatchRecord> {
        self.match_history(username, 1).into_iter().next()
    }

    /// Remove everything
    pub fn clear(&mut self) -> Result<()> {
        self.data = StoreData::default();
        self.persist()
    }
}
