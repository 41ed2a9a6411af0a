//! CLI configuration: logging settings plus the engine's scoring rules

use anyhow::{anyhow, Context, Result};
use scoring_engine::ScoringConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty, compact)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "compact".to_string() }
    }
}

/// Everything the CLI reads from `--config` and the environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub logging: LoggingConfig,
    pub scoring: ScoringConfig,
}

/// Load configuration from an optional TOML file, then environment overrides
pub fn load_config(path: Option<&Path>) -> Result<CliConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => CliConfig::default(),
    };

    load_from_env(&mut config)?;
    validate_config(&config)?;

    Ok(config)
}

fn load_from_file(path: &Path) -> Result<CliConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;
    toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
}

fn load_from_env(config: &mut CliConfig) -> Result<()> {
    if let Ok(level) = std::env::var("SCORING_LOG_LEVEL") {
        config.logging.level = level;
    }

    if let Ok(format) = std::env::var("SCORING_LOG_FORMAT") {
        config.logging.format = format;
    }

    config.scoring.apply_env().context("Invalid SCORING_* environment override")?;

    Ok(())
}

fn validate_config(config: &CliConfig) -> Result<()> {
    match config.logging.level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => {}
        _ => return Err(anyhow!("Invalid log level: {}", config.logging.level)),
    }

    match config.logging.format.as_str() {
        "json" | "pretty" | "compact" => {}
        _ => return Err(anyhow!("Invalid log format: {}", config.logging.format)),
    }

    config.scoring.validate().context("Invalid scoring configuration")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_are_valid() {
        let config = CliConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[logging]\nlevel = \"debug\"\nformat = \"json\"\n\n[scoring]\nunicorn_min_population = 5"
        )
        .unwrap();

        let config = load_from_file(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.scoring.unicorn_min_population, 5);
        assert_eq!(config.scoring.league_win_points, 3);
    }

    #[test]
    fn test_rejects_unknown_format() {
        let mut config = CliConfig::default();
        config.logging.format = "xml".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_from_file(&dir.path().join("scoring.toml")).is_err());
    }
}
