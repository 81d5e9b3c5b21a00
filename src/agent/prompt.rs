//! Seed instruction for a matching run
//!
//! The prompt is a pure function of the profile: no timestamps, no
//! randomness, so identical profiles always produce identical transcripts.

use crate::core::ProfileRecord;

/// Number of teammates the model is asked to return
pub const MATCH_COUNT: usize = 3;

fn join_or_none(values: &[String]) -> String {
    if values.is_empty() {
        "none".to_string()
    } else {
        values.join(", ")
    }
}

/// Build the first user turn for a profile
pub fn build_seed_prompt(profile: &ProfileRecord) -> String {
    let name = match profile.name.trim() {
        "" => "Unknown",
        name => name,
    };
    let goal = match profile.goal.trim() {
        "" => "complementary team",
        goal => goal,
    };

    format!(
        r#"You are a hackathon team matching expert. QUICKLY find {count} BEST matches for this person.

USER:
- Name: {name}
- Skills: {skills}
- Interests: {interests}
- Experience: {experience}
- Roles: {roles}
- Goal: {goal}

SEARCH FOR {count} BEST MATCHES:
1. Search people with skills they need
2. Search people with shared interests
3. Get top candidates
4. RETURN {count} MATCHES WITH WHY (stop after this - NO MORE SEARCHING)

Format: NAME (role/skills) - ONE sentence why they fit
"#,
        count = MATCH_COUNT,
        name = name,
        skills = join_or_none(&profile.skills),
        interests = join_or_none(&profile.interests),
        experience = profile.experience,
        roles = join_or_none(&profile.roles),
        goal = goal,
    )
}
