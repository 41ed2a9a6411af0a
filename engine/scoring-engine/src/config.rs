//! Configuration for the scoring engine

use crate::error::{Result, ScoringError};
use crate::{
    DEFAULT_CHAOS_THRESHOLD_PCT, DEFAULT_MEMO_MAX_ENTRIES, DEFAULT_TOP_PERCENTILE_THRESHOLD,
    DEFAULT_UNICORN_MIN_POPULATION,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Tunable constants of the scoring rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    /// Smallest population in which a lone correct pick counts as a unicorn
    pub unicorn_min_population: usize,

    /// A pick shared by at most this share of the population is a chaos pick (percent)
    pub chaos_threshold_pct: f64,

    /// Percentile at or above which a gameweek extends the best streak
    pub top_percentile_threshold: f64,

    /// Minimum correct/incorrect tallies before a team is eligible for affinity
    pub team_affinity_min_tallies: u32,

    /// Mini-league points for a solo gameweek win
    pub league_win_points: u32,

    /// Mini-league points for a shared gameweek win
    pub league_draw_points: u32,

    /// Memo layer capacity
    pub memo_max_entries: usize,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            unicorn_min_population: DEFAULT_UNICORN_MIN_POPULATION,
            chaos_threshold_pct: DEFAULT_CHAOS_THRESHOLD_PCT,
            top_percentile_threshold: DEFAULT_TOP_PERCENTILE_THRESHOLD,
            team_affinity_min_tallies: 3,
            league_win_points: 3,
            league_draw_points: 1,
            memo_max_entries: DEFAULT_MEMO_MAX_ENTRIES,
        }
    }
}

impl ScoringConfig {
    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env()?;
        Ok(config)
    }

    /// Override fields from `SCORING_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        if let Some(v) = env_parse("SCORING_UNICORN_MIN_POPULATION")? {
            self.unicorn_min_population = v;
        }
        if let Some(v) = env_parse("SCORING_CHAOS_THRESHOLD_PCT")? {
            self.chaos_threshold_pct = v;
        }
        if let Some(v) = env_parse("SCORING_TOP_PERCENTILE")? {
            self.top_percentile_threshold = v;
        }
        if let Some(v) = env_parse("SCORING_TEAM_AFFINITY_MIN")? {
            self.team_affinity_min_tallies = v;
        }
        if let Some(v) = env_parse("SCORING_MEMO_MAX_ENTRIES")? {
            self.memo_max_entries = v;
        }
        Ok(())
    }

    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: ScoringConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that every threshold is in range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.chaos_threshold_pct) {
            return Err(ScoringError::Config(format!(
                "chaos_threshold_pct must be within 0..=100, got {}",
                self.chaos_threshold_pct
            )));
        }
        if !(0.0..=100.0).contains(&self.top_percentile_threshold) {
            return Err(ScoringError::Config(format!(
                "top_percentile_threshold must be within 0..=100, got {}",
                self.top_percentile_threshold
            )));
        }
        if self.league_draw_points > self.league_win_points {
            return Err(ScoringError::Config(
                "league_draw_points must not exceed league_win_points".to_string(),
            ));
        }
        if self.memo_max_entries == 0 {
            return Err(ScoringError::Config("memo_max_entries must be positive".to_string()));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ScoringError::Config(format!("{key} has invalid value '{raw}'"))),
        Err(_) => Ok(None),
    }
}
