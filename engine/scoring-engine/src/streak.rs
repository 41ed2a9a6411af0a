//! Streak tracking over an ordered gameweek list

use crate::types::Gameweek;
use serde::{Deserialize, Serialize};

/// Longest run of consecutive gameweeks satisfying a predicate
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BestStreak {
    pub length: u32,
    pub start_gw: Option<Gameweek>,
    pub end_gw: Option<Gameweek>,
}

impl BestStreak {
    /// `GW{start}–GW{end}`, or `None` when there was no run
    pub fn range_label(&self) -> Option<String> {
        match (self.start_gw, self.end_gw) {
            (Some(start), Some(end)) => Some(format!("GW{start}\u{2013}GW{end}")),
            _ => None,
        }
    }
}

/// Count back from the latest gameweek while `has_score` holds.
///
/// `gws` must be ascending.
pub fn current_streak<F>(gws: &[Gameweek], has_score: F) -> u32
where
    F: Fn(Gameweek) -> bool,
{
    gws.iter().rev().take_while(|&&gw| has_score(gw)).count() as u32
}

/// Longest contiguous run where `predicate` holds, scanning forward.
///
/// Only a strictly longer run replaces the current best, so the earliest of
/// several equal-length runs is reported.
pub fn best_streak<F>(gws: &[Gameweek], predicate: F) -> BestStreak
where
    F: Fn(Gameweek) -> bool,
{
    let mut best = BestStreak::default();
    let mut run_len = 0u32;
    let mut run_start = None;

    for &gw in gws {
        if predicate(gw) {
            if run_len == 0 {
                run_start = Some(gw);
            }
            run_len += 1;
            if run_len > best.length {
                best = BestStreak { length: run_len, start_gw: run_start, end_gw: Some(gw) };
            }
        } else {
            run_len = 0;
            run_start = None;
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_current_streak_stops_at_gap() {
        let played = [1, 2, 4, 5, 6];
        let gws = [1, 2, 3, 4, 5, 6];
        assert_eq!(current_streak(&gws, |gw| played.contains(&gw)), 3);
    }

    #[test]
    fn test_current_streak_latest_missing() {
        let gws = [1, 2, 3];
        assert_eq!(current_streak(&gws, |gw| gw != 3), 0);
        assert_eq!(current_streak(&[], |_| true), 0);
    }

    #[test]
    fn test_best_streak_first_maximal_run_retained() {
        let percentiles: HashMap<u32, f64> =
            HashMap::from([(1, 80.0), (2, 90.0), (3, 60.0), (4, 76.0), (5, 75.0)]);
        let gws = [1, 2, 3, 4, 5];
        let best = best_streak(&gws, |gw| percentiles[&gw] >= 75.0);

        assert_eq!(best.length, 2);
        assert_eq!(best.start_gw, Some(1));
        assert_eq!(best.end_gw, Some(2));
        assert_eq!(best.range_label().as_deref(), Some("GW1–GW2"));
    }

    #[test]
    fn test_best_streak_longer_later_run_wins() {
        let best = best_streak(&[1, 2, 3, 4, 5, 6], |gw| gw != 2);
        assert_eq!(best.length, 4);
        assert_eq!(best.range_label().as_deref(), Some("GW3–GW6"));
    }

    #[test]
    fn test_best_streak_none() {
        let best = best_streak(&[1, 2], |_| false);
        assert_eq!(best.length, 0);
        assert_eq!(best.range_label(), None);
    }
}
