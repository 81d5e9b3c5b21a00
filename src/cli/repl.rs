//! Interactive REPL for Matchmaker
//!
//! Provides the main user interaction loop.

use std::io::{self, BufRead, Write};

use crate::agent::Agent;
use crate::cli::commands::{format_profile, handle_command, CommandResult};
use crate::core::{Config, ExperienceLevel, ProfileRecord, Result};
use crate::store::split_list;

/// Interactive REPL (Read-Eval-Print Loop)
pub struct Repl {
    agent: Agent,
    username: Option<String>,
}

impl Repl {
    /// Create a REPL with custom configuration
    pub fn with_config(config: Config, username: Option<String>) -> Result<Self> {
        Ok(Self {
            agent: Agent::with_config(config)?,
            username,
        })
    }

    /// Run the REPL
    pub async fn run(&mut self) -> Result<()> {
        self.print_banner();

        print!("Initializing...");
        io::stdout().flush()?;

        match self.agent.initialize().await {
            Ok(()) => println!(" Ready!\n"),
            Err(e) => {
                println!("\n\nInitialization Error: {}\n", e);
                return Ok(());
            }
        }

        let username = match self.username.clone() {
            Some(name) => name,
            None => match read_line("Username: ")? {
                Some(name) if !name.is_empty() => name,
                _ => {
                    println!("\nGoodbye!");
                    return Ok(());
                }
            },
        };

        match self.agent.store().get_profile(&username) {
            Some(stored) => println!("\nWelcome back, {}!\n", stored.profile.name),
            None => println!("\nNo saved profile for '{}'. Run 'match' to create one.\n", username),
        }

        loop {
            let input = match read_line("You: ")? {
                Some(input) => input,
                None => {
                    println!("\nGoodbye!");
                    break;
                }
            };

            if input.is_empty() {
                continue;
            }

            match handle_command(&input, &username, &mut self.agent) {
                Ok(CommandResult::Exit) => {
                    println!("\nGoodbye!");
                    break;
                }
                Ok(CommandResult::Handled(output)) => {
                    println!("{}\n", output);
                }
                Ok(CommandResult::Match) => {
                    if let Err(e) = self.run_match(&username).await {
                        eprintln!("\nError: {}\n", e);
                    }
                }
                Ok(CommandResult::ConfirmDelete) => {
                    let answer = read_line(&format!(
                        "Delete profile and history for '{}'? [y/N]: ",
                        username
                    ))?
                    .unwrap_or_default()
                    .to_lowercase();
                    if answer == "y" || answer == "yes" {
                        if self.agent.store_mut().delete_user(&username)? {
                            println!("Deleted.\n");
                        } else {
                            println!("Nothing saved for '{}'.\n", username);
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Command error: {}\n", e);
                }
            }
        }

        Ok(())
    }

    /// Find matches for the saved profile, creating one first if needed
    async fn run_match(&mut self, username: &str) -> Result<()> {
        let profile = match self.agent.store().get_profile(username) {
            Some(stored) => {
                println!("{}\n", format_profile(stored));
                stored.profile.clone()
            }
            None => match collect_profile()? {
                Some(profile) => profile,
                None => return Ok(()),
            },
        };

        println!("Finding teammates...\n");
        let result = self.agent.find_matches(username, &profile).await?;

        if result.success {
            println!("Matches:\n{}\n", result.text);
        } else {
            println!(
                "No confident match after {} turn(s):\n{}\n",
                result.turns_used, result.text
            );
        }
        Ok(())
    }

    /// Print the startup banner
    fn print_banner(&self) {
        let config = self.agent.config();

        println!(
            r#"
+-----------------------------------------------------------+
|                                                           |
|   MATCHMAKER                                              |
|                                                           |
|   Hackathon Teammate Matching                             |
|                                                           |
+-----------------------------------------------------------+
"#
        );
        println!("Ollama:     {}", config.ollama_url());
        println!("Model:      {}", config.model.name);
        println!("People:     {}", self.agent.people_count());
        println!();
        println!("Commands: match, profile, history, update, users, delete, help, exit");
        println!("-----------------------------------------------------------");
    }
}

/// Print a prompt and read one trimmed line; `None` on EOF
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    match io::stdin().lock().read_line(&mut input)? {
        0 => Ok(None),
        _ => Ok(Some(input.trim().to_string())),
    }
}

/// Ask for each profile field in turn
fn collect_profile() -> Result<Option<ProfileRecord>> {
    println!("Let's create your profile. Lists are comma-separated.\n");

    let Some(name) = read_line("Name: ")? else {
        return Ok(None);
    };
    let mut profile = ProfileRecord::new(name);

    profile.skills = split_list(&read_line("Skills: ")?.unwrap_or_default());
    profile.interests = split_list(&read_line("Interests: ")?.unwrap_or_default());

    loop {
        let level = read_line("Experience (beginner/intermediate/advanced) [intermediate]: ")?
            .unwrap_or_default();
        if level.is_empty() {
            break;
        }
        match level.parse::<ExperienceLevel>() {
            Ok(level) => {
                profile.experience = level;
                break;
            }
            Err(e) => println!("{}", e),
        }
    }

    profile.roles = split_list(&read_line("Preferred roles: ")?.unwrap_or_default());
    profile.goal = read_line("What are you looking for in a team? ")?.unwrap_or_default();
    println!();

    Ok(Some(profile))
}
