//! Error types for the scoring engine

use thiserror::Error;

/// Result type for scoring engine operations
pub type Result<T> = std::result::Result<T, ScoringError>;

/// Errors surfaced by the scoring engine.
///
/// Scoring itself never fails; these cover the collaborators around it
/// (fact loading, configuration) whose failures must propagate unchanged.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Fact loader error: {0}")]
    Loader(String),

    #[error("League not found: {0}")]
    LeagueNotFound(String),
}
