//! # Command Line Interface
//!
//! Runs one scoring engine operation over a fact snapshot and prints the
//! result as pretty JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scoring_engine::{FactSnapshot, Gameweek, ScoringEngine, SHORT_FORM_WINDOW};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Scoring CLI for the weekly prediction game
#[derive(Parser, Debug)]
#[command(name = "scoring-cli")]
#[command(about = "Compute leaderboards, league tables and trophies from a fact snapshot")]
pub struct Cli {
    /// Path to the fact snapshot JSON document
    #[arg(short, long, default_value = "./snapshot.json")]
    pub snapshot: PathBuf,

    /// Optional TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Single-gameweek leaderboard
    Gameweek {
        /// Gameweek to rank
        #[arg(long)]
        gw: Gameweek,
    },
    /// Season leaderboard by overall correct picks
    Season {
        /// Last gameweek counted (defaults to the latest completed one)
        #[arg(long)]
        up_to: Option<Gameweek>,
    },
    /// Trailing form leaderboard
    Form {
        /// Last gameweek of the window (defaults to the latest completed one)
        #[arg(long)]
        end: Option<Gameweek>,
        /// Window length in gameweeks
        #[arg(long, default_value_t = SHORT_FORM_WINDOW)]
        length: u32,
    },
    /// Table of one mini-league
    League {
        /// League identifier
        league_id: String,
    },
    /// Tables of every mini-league in the snapshot
    Leagues,
    /// Trophy cabinet of one user
    Trophies {
        /// User identifier
        user_id: String,
    },
    /// Season profile of one user
    Profile {
        /// User identifier
        user_id: String,
    },
    /// Chaos picks and team affinity of one user
    Chaos {
        /// User identifier
        user_id: String,
    },
}

/// CLI handler
pub struct CliHandler {
    engine: ScoringEngine,
    snapshot: FactSnapshot,
}

impl CliHandler {
    pub fn new(engine: ScoringEngine, snapshot: FactSnapshot) -> Self {
        Self { engine, snapshot }
    }

    /// Latest completed gameweek, or the one before the current gameweek
    fn default_gw(&self) -> Gameweek {
        let view = self.engine.season_view(&self.snapshot);
        view.completed_gws().last().copied().unwrap_or_else(|| {
            warn!("No completed gameweek in snapshot v{}", self.snapshot.version);
            self.snapshot.current_gw.saturating_sub(1)
        })
    }

    /// Handle CLI commands, returning the JSON document to print
    pub fn handle_command(&self, command: &Commands) -> Result<String> {
        debug!("Running {:?} on snapshot v{}", command, self.snapshot.version);
        let s = &self.snapshot;
        match command {
            Commands::Gameweek { gw } => to_json(&*self.engine.gameweek_leaderboard(s, *gw)),
            Commands::Season { up_to } => {
                let up_to = up_to.unwrap_or_else(|| self.default_gw());
                to_json(&*self.engine.season_leaderboard(s, up_to))
            }
            Commands::Form { end, length } => {
                let end = end.unwrap_or_else(|| self.default_gw());
                to_json(&*self.engine.form_leaderboard(s, end, *length))
            }
            Commands::League { league_id } => to_json(&*self.engine.league_table(s, league_id)?),
            Commands::Leagues => to_json(&*self.engine.league_tables(s)),
            Commands::Trophies { user_id } => to_json(&*self.engine.trophy_cabinet(s, user_id)),
            Commands::Profile { user_id } => to_json(&*self.engine.profile(s, user_id)),
            Commands::Chaos { user_id } => to_json(&*self.engine.chaos_report(s, user_id)),
        }
    }
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}
