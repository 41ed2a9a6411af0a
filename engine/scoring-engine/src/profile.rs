//! Player profile: one user's season at a glance

use crate::config::ScoringConfig;
use crate::leaderboard::{gameweek_leaderboard, season_leaderboard};
use crate::ranking::NEUTRAL_PERCENTILE;
use crate::season::SeasonView;
use crate::streak::{best_streak, current_streak};
use crate::types::{Gameweek, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameweekHistory {
    pub gw: Gameweek,
    pub correct: u32,
    pub unicorns: u32,
    pub rank: u32,
    pub percentile: f64,
    /// Fully decided and before the current gameweek
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub user_id: UserId,
    pub name: String,
    pub history: Vec<GameweekHistory>,
    pub current_streak: u32,
    pub best_streak: u32,
    /// `GW{a}–GW{b}` of the best streak
    pub best_streak_range: Option<String>,
    pub ocp: u32,
    pub unicorns: u32,
    pub season_rank: Option<u32>,
    pub season_percentile: f64,
}

pub fn build_profile(view: &SeasonView, user_id: &str, config: &ScoringConfig) -> PlayerProfile {
    let completed = view.completed_gws();

    let mut history = Vec::new();
    let mut percentiles: BTreeMap<Gameweek, f64> = BTreeMap::new();
    for (&gw, scores) in view.global_scores() {
        let Some(score) = scores.iter().find(|s| s.user_id == user_id) else { continue };
        let board = gameweek_leaderboard(view, gw);
        let Some(entry) = board.iter().find(|e| e.subject_id == user_id) else { continue };
        percentiles.insert(gw, entry.percentile);
        history.push(GameweekHistory {
            gw,
            correct: score.correct_count,
            unicorns: score.unicorn_count,
            rank: entry.rank,
            percentile: entry.percentile,
            completed: completed.binary_search(&gw).is_ok(),
        });
    }

    // An undecided earlier gameweek breaks a run instead of being skipped
    let past = view.past_gws();
    let current = current_streak(&past, |gw| {
        view.is_completed(gw) && view.score_of(gw, user_id).is_some()
    });
    let best = best_streak(&past, |gw| {
        view.is_completed(gw)
            && percentiles.get(&gw).is_some_and(|&p| p >= config.top_percentile_threshold)
    });

    let (ocp, unicorns) = history
        .iter()
        .filter(|h| h.completed)
        .fold((0, 0), |(ocp, uni), h| (ocp + h.correct, uni + h.unicorns));

    let season_entry = completed
        .last()
        .map(|&gw| season_leaderboard(view, gw))
        .and_then(|board| board.into_iter().find(|e| e.subject_id == user_id));

    PlayerProfile {
        user_id: user_id.to_string(),
        name: view.names.name_of(user_id).to_string(),
        history,
        current_streak: current,
        best_streak: best.length,
        best_streak_range: best.range_label(),
        ocp,
        unicorns,
        season_rank: season_entry.as_ref().map(|e| e.rank),
        season_percentile: season_entry.map(|e| e.percentile).unwrap_or(NEUTRAL_PERCENTILE),
    }
}
