//! Global leaderboards built from a [`SeasonView`]

use crate::form::{form_ranking, trailing_window};
use crate::gameweek::Population;
use crate::ranking::{rank_score_lines, ScoreLine};
use crate::season::SeasonView;
use crate::types::{Gameweek, RankedEntry, UserId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Season-to-date totals for one user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTotals {
    pub ocp: u32,
    pub unicorns: u32,
    pub gameweeks_played: u32,
}

/// Cumulative totals over every completed gameweek up to and including `up_to`
pub fn season_totals(view: &SeasonView, up_to: Gameweek) -> BTreeMap<UserId, SeasonTotals> {
    let mut totals: BTreeMap<UserId, SeasonTotals> = BTreeMap::new();
    for (_, scores) in view.completed_scores().range(..=up_to) {
        for score in scores {
            let entry = totals.entry(score.user_id.clone()).or_default();
            entry.ocp += score.correct_count;
            entry.unicorns += score.unicorn_count;
            entry.gameweeks_played += 1;
        }
    }
    totals
}

/// Single-gameweek leaderboard over everyone with a score that week.
///
/// Ties on correct picks are ordered by unicorns, then season OCP to date,
/// then name.
pub fn gameweek_leaderboard(view: &SeasonView, gw: Gameweek) -> Vec<RankedEntry> {
    let totals = season_totals(view, gw);
    let lines = view
        .scores(gw)
        .iter()
        .map(|s| {
            let ocp = totals.get(&s.user_id).map(|t| t.ocp).unwrap_or(0);
            ScoreLine::new(s.user_id.clone(), view.names.name_of(&s.user_id), s.correct_count)
                .with_tie_keys(vec![s.unicorn_count, ocp])
        })
        .collect();
    rank_score_lines(lines)
}

/// Season OCP leaderboard using only data up to and including `up_to`
pub fn season_leaderboard(view: &SeasonView, up_to: Gameweek) -> Vec<RankedEntry> {
    let lines = season_totals(view, up_to)
        .into_iter()
        .map(|(user, t)| {
            let name = view.names.name_of(&user).to_string();
            ScoreLine::new(user, name, t.ocp).with_tie_keys(vec![t.unicorns])
        })
        .collect();
    rank_score_lines(lines)
}

/// Trailing-form leaderboard of `length` weeks ending at `end_gw`.
///
/// Empty when the season has not reached `length` gameweeks yet, or when any
/// week of the window is not completed.
pub fn form_leaderboard(view: &SeasonView, end_gw: Gameweek, length: u32) -> Vec<RankedEntry> {
    match trailing_window(end_gw, length) {
        Some(window) => form_ranking(view.completed_scores(), &Population::Global, window, &view.names),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::types::{Choice, FactSnapshot, Fixture, MatchResult, Pick, Submission, User};
    use chrono::Utc;

    /// Three users, two gameweeks of one fixture each
    fn view() -> SeasonView {
        let mut snapshot = FactSnapshot {
            current_gw: 3,
            users: vec![
                User { user_id: "a".into(), name: "Ann".into() },
                User { user_id: "b".into(), name: "Ben".into() },
                User { user_id: "c".into(), name: "Cal".into() },
            ],
            ..Default::default()
        };
        for gw in 1..=2 {
            snapshot.fixtures.push(Fixture {
                gw,
                fixture_index: 0,
                home_id: "ARS".into(),
                away_id: "CHE".into(),
                kickoff_time: Utc::now(),
            });
            snapshot.results.push(MatchResult { gw, fixture_index: 0, outcome: Choice::Home });
            for user in ["a", "b", "c"] {
                snapshot.submissions.push(Submission {
                    user_id: user.into(),
                    gw,
                    submitted_at: Utc::now(),
                });
            }
        }
        // gw1: only a right (unicorn). gw2: a and b right.
        let picks = [
            ("a", 1, Choice::Home),
            ("b", 1, Choice::Away),
            ("c", 1, Choice::Draw),
            ("a", 2, Choice::Home),
            ("b", 2, Choice::Home),
            ("c", 2, Choice::Away),
        ];
        for (user, gw, choice) in picks {
            snapshot.picks.push(Pick { user_id: user.into(), gw, fixture_index: 0, choice });
        }
        SeasonView::build(&snapshot, &ScoringConfig::default())
    }

    #[test]
    fn test_gameweek_leaderboard() {
        let rows = gameweek_leaderboard(&view(), 2);
        assert_eq!(rows.len(), 3);
        // a and b tied on correct picks; a ahead on season OCP
        assert_eq!(rows[0].subject_id, "a");
        assert_eq!(rows[1].subject_id, "b");
        assert_eq!((rows[0].rank, rows[1].rank, rows[2].rank), (1, 1, 3));
        assert_eq!(rows[2].percentile, 33.33);
    }

    #[test]
    fn test_season_leaderboard_respects_cutoff() {
        let v = view();
        let after_one = season_leaderboard(&v, 1);
        assert_eq!(after_one[0].subject_id, "a");
        assert_eq!(after_one[0].value, 1);
        assert_eq!(after_one[1].rank, 2);

        let after_two = season_leaderboard(&v, 2);
        assert_eq!(after_two[0].value, 2);
        assert_eq!(after_two[1].value, 1);
    }

    #[test]
    fn test_season_totals_count_unicorns() {
        let totals = season_totals(&view(), 2);
        assert_eq!(totals["a"].unicorns, 1);
        assert_eq!(totals["a"].gameweeks_played, 2);
        assert_eq!(totals["b"].unicorns, 0);
    }

    #[test]
    fn test_form_leaderboard_needs_full_window() {
        let v = view();
        assert!(form_leaderboard(&v, 2, 5).is_empty());
        let rows = form_leaderboard(&v, 2, 2);
        assert_eq!(rows[0].value, 2);
    }
}
