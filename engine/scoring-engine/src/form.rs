//! Form rankings over a contiguous gameweek window
//!
//! Only users with a score in every gameweek of the window are ranked.
//! Missing a week removes the user from the window entirely; it is never
//! scored as zero.

use crate::gameweek::Population;
use crate::ranking::{rank_score_lines, ScoreLine};
use crate::types::{Gameweek, GwScore, NameBook, RankedEntry, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Inclusive gameweek range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormWindow {
    pub start: Gameweek,
    pub end: Gameweek,
}

impl FormWindow {
    pub fn new(start: Gameweek, end: Gameweek) -> Self {
        Self { start, end }
    }

    pub fn is_empty(&self) -> bool {
        self.end < self.start
    }

    pub fn gameweeks(&self) -> std::ops::RangeInclusive<Gameweek> {
        self.start..=self.end
    }
}

/// The `length` gameweeks ending at `end_gw`, if the season is long enough
pub fn trailing_window(end_gw: Gameweek, length: u32) -> Option<FormWindow> {
    if length == 0 || end_gw < length {
        return None;
    }
    Some(FormWindow::new(end_gw + 1 - length, end_gw))
}

/// Summed `correct_count` of every eligible population member over the window
pub fn window_points(
    scores: &BTreeMap<Gameweek, Vec<GwScore>>,
    population: &Population,
    window: FormWindow,
) -> BTreeMap<UserId, u32> {
    if window.is_empty() {
        return BTreeMap::new();
    }

    let mut totals: BTreeMap<UserId, (u32, u32)> = BTreeMap::new();
    for gw in window.gameweeks() {
        let Some(week) = scores.get(&gw) else {
            // Nobody played this week, so nobody is eligible
            return BTreeMap::new();
        };
        for score in week.iter().filter(|s| population.contains(&s.user_id)) {
            let entry = totals.entry(score.user_id.clone()).or_insert((0, 0));
            entry.0 += score.correct_count;
            entry.1 += 1;
        }
    }

    let weeks = window.end - window.start + 1;
    totals
        .into_iter()
        .filter(|(_, (_, played))| *played == weeks)
        .map(|(user, (points, _))| (user, points))
        .collect()
}

/// Rank eligible users by form points, ties by name
pub fn form_ranking(
    scores: &BTreeMap<Gameweek, Vec<GwScore>>,
    population: &Population,
    window: FormWindow,
    names: &NameBook,
) -> Vec<RankedEntry> {
    let lines = window_points(scores, population, window)
        .into_iter()
        .map(|(user, points)| {
            let name = names.name_of(&user).to_string();
            ScoreLine::new(user, name, points)
        })
        .collect();
    rank_score_lines(lines)
}
