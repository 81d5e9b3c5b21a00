//! CLI commands
//!
//! Commands that can be executed in the REPL.

use crate::agent::Agent;
use crate::core::Result;
use crate::store::{ProfileUpdate, StoredProfile};

/// Result of parsing a command
#[derive(Debug, PartialEq)]
pub enum CommandResult {
    /// Command was handled, show output
    Handled(String),
    /// Run a match (the REPL may need to collect a profile first)
    Match,
    /// Ask for confirmation, then delete the user
    ConfirmDelete,
    /// Exit the REPL
    Exit,
}

/// Number of history entries shown by default
const DEFAULT_HISTORY: usize = 5;

/// Longest match text shown per history entry
const HISTORY_PREVIEW_CHARS: usize = 300;

/// Parse and handle a command
pub fn handle_command(input: &str, username: &str, agent: &mut Agent) -> Result<CommandResult> {
    let input = input.trim();
    let parts: Vec<&str> = input.splitn(2, ' ').collect();
    let cmd = parts[0].trim_start_matches('/').to_lowercase();
    let args = parts.get(1).map(|s| s.trim()).unwrap_or("");

    match cmd.as_str() {
        "exit" | "quit" | "q" => Ok(CommandResult::Exit),

        "help" | "?" => Ok(CommandResult::Handled(help_text())),

        "match" | "find" => Ok(CommandResult::Match),

        "profile" => Ok(CommandResult::Handled(
            match agent.store().get_profile(username) {
                Some(stored) => format_profile(stored),
                None => "No profile found. Run 'match' to create one.".to_string(),
            },
        )),

        "history" => {
            let limit = args.parse().unwrap_or(DEFAULT_HISTORY);
            Ok(CommandResult::Handled(format_history(
                agent, username, limit,
            )))
        }

        "update" => handle_update(args, username, agent),

        "users" => {
            let users = agent.store().list_users();
            if users.is_empty() {
                return Ok(CommandResult::Handled("No users saved yet".to_string()));
            }
            let lines: Vec<String> = users
                .iter()
                .map(|u| {
                    let name = agent
                        .store()
                        .get_profile(u)
                        .map(|s| s.profile.name.as_str())
                        .unwrap_or("N/A");
                    format!("  - {}: {}", u, name)
                })
                .collect();
            Ok(CommandResult::Handled(format!(
                "Saved users:\n{}",
                lines.join("\n")
            )))
        }

        "delete" => Ok(CommandResult::ConfirmDelete),

        "status" => Ok(CommandResult::Handled(format!(
            "Matchmaker Status:\n\
             ─────────────────────────────\n\
             User:      {}\n\
             Model:     {}\n\
             People:    {}\n\
             Tools:     {}\n\
             Max turns: {}",
            username,
            agent.config().model.name,
            agent.people_count(),
            agent.tool_names().join(", "),
            agent.config().agent.max_turns,
        ))),

        _ => Ok(CommandResult::Handled(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            cmd
        ))),
    }
}

/// Handle 'update <field> <value>'
fn handle_update(args: &str, username: &str, agent: &mut Agent) -> Result<CommandResult> {
    let parts: Vec<&str> = args.splitn(2, ' ').collect();
    let field = parts[0];
    let value = parts.get(1).map(|s| s.trim()).unwrap_or("");

    if field.is_empty() || value.is_empty() {
        return Ok(CommandResult::Handled(
            "Usage: update <skills|interests|experience|roles|goal> <value>\n\
             Examples:\n\
               update skills Rust, Go\n\
               update experience advanced"
                .to_string(),
        ));
    }

    let update = match ProfileUpdate::parse(field, value) {
        Ok(update) => update,
        Err(e) => return Ok(CommandResult::Handled(e.to_string())),
    };

    if agent.store().get_profile(username).is_none() {
        return Ok(CommandResult::Handled(
            "No profile found. Run 'match' to create one.".to_string(),
        ));
    }

    agent.update_profile(username, update)?;
    Ok(CommandResult::Handled("Profile updated!".to_string()))
}

/// Render a saved profile
pub fn format_profile(stored: &StoredProfile) -> String {
    let p = &stored.profile;
    format!(
        "Profile for: {}\n\
         Skills: {}\n\
         Interests: {}\n\
         Experience Level: {}\n\
         Role Preferences: {}\n\
         Looking For: {}\n\
         Last Updated: {}",
        p.name,
        p.skills.join(", "),
        p.interests.join(", "),
        p.experience,
        p.roles.join(", "),
        p.goal,
        stored.updated_at.to_rfc3339(),
    )
}

fn format_history(agent: &Agent, username: &str, limit: usize) -> String {
    let history = agent.store().match_history(username, limit);
    if history.is_empty() {
        return "No match history found".to_string();
    }

    let mut output = format!("Match History for {}\n", username);
    for (i, item) in history.iter().enumerate() {
        let preview: String = item.matches.chars().take(HISTORY_PREVIEW_CHARS).collect();
        let ellipsis = if item.matches.chars().count() > HISTORY_PREVIEW_CHARS {
            "..."
        } else {
            ""
        };
        output.push_str(&format!(
            "\n--- Match #{} ({}) ---\nQuery: {}\n\n{}{}\n",
            i + 1,
            item.timestamp.to_rfc3339(),
            item.query,
            preview,
            ellipsis
        ));
    }
    output
}

/// Generate help text
fn help_text() -> String {
    r#"Matchmaker Commands:
─────────────────────────────────────────────
  help, ?                 Show this help message
  match                   Find teammates for your profile
  profile                 Show your saved profile
  history [n]             Show your last n match results
  update <field> <value>  Change skills, interests, experience, roles or goal
  users                   List saved users
  delete                  Delete your profile and history
  status                  Show current configuration
  exit, quit, q           Exit

Lists are comma-separated, e.g. 'update skills Rust, Go'
─────────────────────────────────────────────"#
        .to_string()
}
