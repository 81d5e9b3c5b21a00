//! Team-matching tools
//!
//! Tools backed by the shared people directory.

mod search;
mod team_fit;

pub use search::{GetAllPeopleTool, SearchByInterestTool, SearchByRoleTool, SearchBySkillTool};
pub use team_fit::CalculateTeamFitTool;
