//! Chaos picks and team affinity
//!
//! A chaos pick goes against the crowd: at most a quarter of all gated picks
//! on that fixture share it. Team affinity tallies how often a user calls
//! games involving a given team correctly.

use crate::ranking::round2;
use crate::season::SeasonView;
use crate::types::{Choice, TeamId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChaosStats {
    pub decided_picks: u32,
    pub chaos_picks: u32,
    pub correct_chaos_picks: u32,
    /// Chaos picks as a percentage of decided picks
    pub chaos_index: f64,
}

/// Share of the population (in percent) that made `choice` on the fixture
fn choice_share(choices: impl Iterator<Item = Choice>, choice: Choice) -> f64 {
    let (mut same, mut total) = (0u32, 0u32);
    for c in choices {
        total += 1;
        if c == choice {
            same += 1;
        }
    }
    if total == 0 {
        return 0.0;
    }
    100.0 * same as f64 / total as f64
}

/// Chaos statistics over every decided pick of `user_id`
pub fn analyze_chaos(view: &SeasonView, user_id: &str, threshold_pct: f64) -> ChaosStats {
    let mut stats = ChaosStats::default();

    for facts in view.gameweeks() {
        for (fixture_index, choice) in facts.picks.user_picks(user_id) {
            let Some(outcome) = facts.outcomes.get(fixture_index) else { continue };
            stats.decided_picks += 1;

            let share = choice_share(facts.picks.choices_for(fixture_index), choice);
            if share <= threshold_pct {
                stats.chaos_picks += 1;
                if choice == outcome {
                    stats.correct_chaos_picks += 1;
                }
            }
        }
    }

    if stats.decided_picks > 0 {
        stats.chaos_index = round2(100.0 * stats.chaos_picks as f64 / stats.decided_picks as f64);
    }
    stats
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamTally {
    pub team_id: TeamId,
    pub correct: u32,
    pub total: u32,
}

impl TeamTally {
    pub fn correct_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64
    }

    pub fn incorrect_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.total - self.correct) as f64 / self.total as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamAffinity {
    /// Team the user reads best
    pub best_team: Option<TeamTally>,
    /// Team the user reads worst
    pub worst_team: Option<TeamTally>,
}

/// Per-team tallies in first-seen order: gameweek, fixture, home before away
pub fn team_tallies(view: &SeasonView, user_id: &str) -> Vec<TeamTally> {
    let mut tallies: Vec<TeamTally> = Vec::new();
    let mut index: HashMap<TeamId, usize> = HashMap::new();

    for facts in view.gameweeks() {
        for (fixture_index, choice) in facts.picks.user_picks(user_id) {
            let Some(outcome) = facts.outcomes.get(fixture_index) else { continue };
            let Some(fixture) = facts.fixture(fixture_index) else { continue };
            let correct = choice == outcome;

            for team in [&fixture.home_id, &fixture.away_id] {
                let slot = *index.entry(team.clone()).or_insert_with(|| {
                    tallies.push(TeamTally { team_id: team.clone(), correct: 0, total: 0 });
                    tallies.len() - 1
                });
                tallies[slot].total += 1;
                if correct {
                    tallies[slot].correct += 1;
                }
            }
        }
    }

    tallies
}

/// Best and worst team among those with at least `min_tallies` picks.
///
/// Under equal rates the first-seen team is kept.
pub fn team_affinity(view: &SeasonView, user_id: &str, min_tallies: u32) -> TeamAffinity {
    let eligible: Vec<TeamTally> =
        team_tallies(view, user_id).into_iter().filter(|t| t.total >= min_tallies).collect();

    let mut best: Option<&TeamTally> = None;
    let mut worst: Option<&TeamTally> = None;
    for tally in &eligible {
        if best.map_or(true, |b| tally.correct_rate() > b.correct_rate()) {
            best = Some(tally);
        }
        if worst.map_or(true, |w| tally.incorrect_rate() > w.incorrect_rate()) {
            worst = Some(tally);
        }
    }

    TeamAffinity { best_team: best.cloned(), worst_team: worst.cloned() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScoringConfig;
    use crate::types::{FactSnapshot, Fixture, MatchResult, Pick, Submission};
    use chrono::Utc;

    fn add_fixture(s: &mut FactSnapshot, gw: u32, idx: u32, home: &str, away: &str, outcome: Option<Choice>) {
        s.fixtures.push(Fixture {
            gw,
            fixture_index: idx,
            home_id: home.into(),
            away_id: away.into(),
            kickoff_time: Utc::now(),
        });
        if let Some(outcome) = outcome {
            s.results.push(MatchResult { gw, fixture_index: idx, outcome });
        }
    }

    fn add_pick(s: &mut FactSnapshot, user: &str, gw: u32, idx: u32, choice: Choice) {
        if !s.submissions.iter().any(|sub| sub.user_id == user && sub.gw == gw) {
            s.submissions.push(Submission { user_id: user.into(), gw, submitted_at: Utc::now() });
        }
        s.picks.push(Pick { user_id: user.into(), gw, fixture_index: idx, choice });
    }

    #[test]
    fn test_chaos_pick_threshold_inclusive() {
        let mut s = FactSnapshot { current_gw: 2, ..Default::default() };
        add_fixture(&mut s, 1, 0, "ARS", "CHE", Some(Choice::Away));
        add_pick(&mut s, "me", 1, 0, Choice::Away);
        for user in ["p", "q", "r"] {
            add_pick(&mut s, user, 1, 0, Choice::Home);
        }
        let view = SeasonView::build(&s, &ScoringConfig::default());

        // 1 of 4 picked Away: exactly 25%
        let stats = analyze_chaos(&view, "me", 25.0);
        assert_eq!(stats.decided_picks, 1);
        assert_eq!(stats.chaos_picks, 1);
        assert_eq!(stats.correct_chaos_picks, 1);
        assert_eq!(stats.chaos_index, 100.0);

        let crowd = analyze_chaos(&view, "p", 25.0);
        assert_eq!(crowd.chaos_picks, 0);
        assert_eq!(crowd.chaos_index, 0.0);
    }

    #[test]
    fn test_chaos_skips_undecided_and_unsubmitted() {
        let mut s = FactSnapshot { current_gw: 2, ..Default::default() };
        add_fixture(&mut s, 1, 0, "ARS", "CHE", Some(Choice::Home));
        add_fixture(&mut s, 1, 1, "LIV", "EVE", None);
        add_pick(&mut s, "me", 1, 0, Choice::Home);
        add_pick(&mut s, "me", 1, 1, Choice::Draw);
        // Not submitted, so not part of the population
        s.picks.push(Pick { user_id: "ghost".into(), gw: 1, fixture_index: 0, choice: Choice::Away });
        let view = SeasonView::build(&s, &ScoringConfig::default());

        let stats = analyze_chaos(&view, "me", 25.0);
        assert_eq!(stats.decided_picks, 1);
        assert_eq!(stats.chaos_picks, 0);
    }

    #[test]
    fn test_no_decided_picks_gives_zero_index() {
        let view = SeasonView::build(&FactSnapshot::default(), &ScoringConfig::default());
        assert_eq!(analyze_chaos(&view, "me", 25.0), ChaosStats::default());
    }

    #[test]
    fn test_team_affinity_best_and_worst() {
        let mut s = FactSnapshot { current_gw: 4, ..Default::default() };
        for gw in 1..=3 {
            add_fixture(&mut s, gw, 0, "ARS", "CHE", Some(Choice::Home));
            add_fixture(&mut s, gw, 1, "LIV", "EVE", Some(Choice::Home));
            add_pick(&mut s, "me", gw, 0, Choice::Home);
            // Wrong on LIV-EVE twice out of three
            let choice = if gw == 1 { Choice::Home } else { Choice::Away };
            add_pick(&mut s, "me", gw, 1, choice);
        }
        // A single MUN fixture never reaches the minimum
        add_fixture(&mut s, 3, 2, "MUN", "TOT", Some(Choice::Draw));
        add_pick(&mut s, "me", 3, 2, Choice::Away);
        let view = SeasonView::build(&s, &ScoringConfig::default());

        let affinity = team_affinity(&view, "me", 3);
        let best = affinity.best_team.unwrap();
        let worst = affinity.worst_team.unwrap();
        // ARS and CHE are both 3/3; ARS was seen first
        assert_eq!(best.team_id, "ARS");
        assert_eq!((best.correct, best.total), (3, 3));
        // LIV and EVE are both 1/3; LIV was seen first
        assert_eq!(worst.team_id, "LIV");
        assert_eq!((worst.correct, worst.total), (1, 3));
    }

    #[test]
    fn test_team_affinity_nothing_eligible() {
        let mut s = FactSnapshot { current_gw: 2, ..Default::default() };
        add_fixture(&mut s, 1, 0, "ARS", "CHE", Some(Choice::Home));
        add_pick(&mut s, "me", 1, 0, Choice::Home);
        let view = SeasonView::build(&s, &ScoringConfig::default());
        assert_eq!(team_affinity(&view, "me", 3), TeamAffinity::default());
    }
}
