//! # Scoring Engine
//!
//! Deterministic scoring and ranking for a weekly football-prediction game.
//!
//! The engine turns one consistent [`FactSnapshot`] of fixtures, picks,
//! submissions, results, live scores and league membership into every
//! statistic the game shows: gameweek scores with unicorns, competition
//! rankings and percentiles, trailing form, streaks, mini-league tables,
//! trophy counts and chaos/team-affinity stats. All computations are pure;
//! [`ScoringEngine`] adds a memo layer keyed by snapshot version.

pub mod chaos;
pub mod config;
pub mod engine;
pub mod error;
pub mod form;
pub mod gameweek;
pub mod leaderboard;
pub mod loader;
pub mod memo;
pub mod mini_league;
pub mod outcome;
pub mod profile;
pub mod ranking;
pub mod season;
pub mod streak;
pub mod trophy;
pub mod types;


pub use chaos::{analyze_chaos, team_affinity, ChaosStats, TeamAffinity, TeamTally};
pub use config::ScoringConfig;
pub use engine::{ChaosReport, ScoringEngine};
pub use error::{Result, ScoringError};
pub use gameweek::{score_gameweek, GameweekPicks, Population};
pub use loader::{FactLoader, InMemoryLoader, JsonFileLoader};
pub use memo::{CacheScope, TableCache};
pub use mini_league::{build_all_league_tables, build_league_table, LeagueTable, LeagueTableRow};
pub use outcome::{resolve_outcomes, OutcomeMap};
pub use profile::{build_profile, PlayerProfile};
pub use ranking::{percentile, rank_by, Ranked};
pub use season::SeasonView;
pub use trophy::{build_trophy_cabinet, TrophyCabinet};
pub use types::*;

/// Current version of the scoring engine
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Smallest population in which a lone correct pick is a unicorn
pub const DEFAULT_UNICORN_MIN_POPULATION: usize = 3;

/// Chaos picks are shared by at most this share of pickers (percent)
pub const DEFAULT_CHAOS_THRESHOLD_PCT: f64 = 25.0;

/// Percentile that counts as a top-quartile gameweek
pub const DEFAULT_TOP_PERCENTILE_THRESHOLD: f64 = 75.0;

/// Default memo capacity per table kind
pub const DEFAULT_MEMO_MAX_ENTRIES: usize = 1024;

/// Short trailing form window (weeks)
pub const SHORT_FORM_WINDOW: u32 = 5;

/// Long trailing form window (weeks)
pub const LONG_FORM_WINDOW: u32 = 10;
