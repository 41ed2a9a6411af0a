//! Fact and derived types shared by every scoring component

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// User identifier
pub type UserId = String;

/// Mini-league identifier
pub type LeagueId = String;

/// Team identifier (club code)
pub type TeamId = String;

/// Gameweek number (1-based)
pub type Gameweek = u32;

/// Position of a fixture inside its gameweek
pub type FixtureIndex = u32;

/// A user's pick for one fixture, and also a fixture's outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Home,
    Draw,
    Away,
}

impl Choice {
    /// Outcome implied by a scoreline
    pub fn from_score(home_score: u32, away_score: u32) -> Self {
        match home_score.cmp(&away_score) {
            std::cmp::Ordering::Greater => Choice::Home,
            std::cmp::Ordering::Less => Choice::Away,
            std::cmp::Ordering::Equal => Choice::Draw,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Home => write!(f, "H"),
            Choice::Draw => write!(f, "D"),
            Choice::Away => write!(f, "A"),
        }
    }
}

/// A registered player of the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: UserId,
    pub name: String,
}

/// A published fixture. Identity is `(gw, fixture_index)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub gw: Gameweek,
    pub fixture_index: FixtureIndex,
    pub home_id: TeamId,
    pub away_id: TeamId,
    pub kickoff_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pick {
    pub user_id: UserId,
    pub gw: Gameweek,
    pub fixture_index: FixtureIndex,
    pub choice: Choice,
}

/// Marks a user's picks for a gameweek as final
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub user_id: UserId,
    pub gw: Gameweek,
    pub submitted_at: DateTime<Utc>,
}

/// Stored settlement result for an ended fixture
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResult {
    pub gw: Gameweek,
    pub fixture_index: FixtureIndex,
    pub outcome: Choice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiveStatus {
    Scheduled,
    InPlay,
    Paused,
    Finished,
}

impl LiveStatus {
    /// Whether the match has kicked off
    pub fn has_started(&self) -> bool {
        matches!(self, LiveStatus::InPlay | LiveStatus::Paused | LiveStatus::Finished)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FixtureRef {
    pub gw: Gameweek,
    pub fixture_index: FixtureIndex,
}

/// Transient live score feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveScore {
    pub fixture_ref: FixtureRef,
    pub home_score: u32,
    pub away_score: u32,
    pub status: LiveStatus,
}

/// A mini-league with its externally resolved first counted gameweek
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    pub league_id: LeagueId,
    pub name: String,
    pub start_gw: Gameweek,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueMembership {
    pub league_id: LeagueId,
    pub user_id: UserId,
}

/// One user's score for one gameweek within one population
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GwScore {
    pub user_id: UserId,
    pub gw: Gameweek,
    pub correct_count: u32,
    pub unicorn_count: u32,
}

/// A ranked row ready for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub subject_id: UserId,
    pub name: String,
    pub value: u32,
    pub rank: u32,
    pub tied: bool,
    pub percentile: f64,
}

/// One consistent read of every fact the engine consumes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FactSnapshot {
    /// Opaque, loader-assigned version; keys the memo layer
    #[serde(default)]
    pub version: u64,
    pub current_gw: Gameweek,
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub fixtures: Vec<Fixture>,
    #[serde(default)]
    pub picks: Vec<Pick>,
    #[serde(default)]
    pub submissions: Vec<Submission>,
    #[serde(default)]
    pub results: Vec<MatchResult>,
    #[serde(default)]
    pub live_scores: Vec<LiveScore>,
    #[serde(default)]
    pub leagues: Vec<League>,
    #[serde(default)]
    pub memberships: Vec<LeagueMembership>,
}

impl FactSnapshot {
    /// Look up a league by id
    pub fn league(&self, league_id: &str) -> Option<&League> {
        self.leagues.iter().find(|l| l.league_id == league_id)
    }

    /// Members of a league in membership order, deduplicated
    pub fn league_members(&self, league_id: &str) -> Vec<UserId> {
        let mut members: Vec<UserId> = Vec::new();
        for m in self.memberships.iter().filter(|m| m.league_id == league_id) {
            if !members.contains(&m.user_id) {
                members.push(m.user_id.clone());
            }
        }
        members
    }
}

/// Display names for the `name asc` tie-break; unknown users sort by id
#[derive(Debug, Clone, Default)]
pub struct NameBook {
    names: HashMap<UserId, String>,
}

impl NameBook {
    pub fn from_users(users: &[User]) -> Self {
        Self { names: users.iter().map(|u| (u.user_id.clone(), u.name.clone())).collect() }
    }

    pub fn name_of<'a>(&'a self, user_id: &'a str) -> &'a str {
        self.names.get(user_id).map(String::as_str).unwrap_or(user_id)
    }
}
