//! Season view
//!
//! One pass over a [`FactSnapshot`] that resolves outcomes, applies
//! submission gating and computes global gameweek scores. Every higher-level
//! computation reads from the same view, so a table never mixes two
//! snapshots.

use crate::config::ScoringConfig;
use crate::gameweek::{score_gameweek, GameweekPicks, Population};
use crate::outcome::{resolve_outcomes, OutcomeMap};
use crate::types::{FactSnapshot, Fixture, FixtureIndex, Gameweek, GwScore, NameBook};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use tracing::{debug, warn};

/// Everything known about one gameweek
#[derive(Debug, Clone)]
pub struct GameweekFacts {
    pub gw: Gameweek,
    /// Published fixtures ordered by index
    pub fixtures: Vec<Fixture>,
    pub outcomes: OutcomeMap,
    pub picks: GameweekPicks,
    /// Every fixture has a canonical outcome
    pub fully_decided: bool,
}

impl GameweekFacts {
    pub fn fixture(&self, fixture_index: FixtureIndex) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.fixture_index == fixture_index)
    }
}

#[derive(Debug, Clone)]
pub struct SeasonView {
    pub version: u64,
    pub current_gw: Gameweek,
    pub names: NameBook,
    gameweeks: BTreeMap<Gameweek, GameweekFacts>,
    global_scores: BTreeMap<Gameweek, Vec<GwScore>>,
    /// `global_scores` restricted to completed gameweeks
    completed_scores: BTreeMap<Gameweek, Vec<GwScore>>,
}

impl SeasonView {
    pub fn build(snapshot: &FactSnapshot, config: &ScoringConfig) -> Self {
        let mut fixtures_by_gw: BTreeMap<Gameweek, Vec<Fixture>> = BTreeMap::new();
        for fixture in &snapshot.fixtures {
            fixtures_by_gw.entry(fixture.gw).or_default().push(fixture.clone());
        }

        let mut gws: BTreeSet<Gameweek> = fixtures_by_gw.keys().copied().collect();
        gws.extend(snapshot.submissions.iter().map(|s| s.gw));

        let known: HashSet<(Gameweek, FixtureIndex)> =
            snapshot.fixtures.iter().map(|f| (f.gw, f.fixture_index)).collect();
        let stray = snapshot.picks.iter().filter(|p| !known.contains(&(p.gw, p.fixture_index))).count();
        if stray > 0 {
            warn!("Snapshot {} has {} picks on unpublished fixtures", snapshot.version, stray);
        }

        let mut gameweeks = BTreeMap::new();
        let mut global_scores = BTreeMap::new();

        for gw in gws {
            let mut fixtures = fixtures_by_gw.remove(&gw).unwrap_or_default();
            fixtures.sort_by_key(|f| f.fixture_index);
            fixtures.dedup_by_key(|f| f.fixture_index);

            let outcomes = resolve_outcomes(gw, &snapshot.results, &snapshot.live_scores);
            let picks = GameweekPicks::gate(gw, &snapshot.picks, &snapshot.submissions);
            let fully_decided = outcomes.is_fully_decided(fixtures.iter().map(|f| &f.fixture_index));

            let scores =
                score_gameweek(&outcomes, &picks, &Population::Global, config.unicorn_min_population);
            if !scores.is_empty() {
                global_scores.insert(gw, scores);
            }

            gameweeks.insert(gw, GameweekFacts { gw, fixtures, outcomes, picks, fully_decided });
        }

        let completed_scores: BTreeMap<Gameweek, Vec<GwScore>> = global_scores
            .iter()
            .filter(|(gw, _)| {
                **gw < snapshot.current_gw
                    && gameweeks.get(*gw).is_some_and(|g| g.fully_decided)
            })
            .map(|(gw, scores)| (*gw, scores.clone()))
            .collect();

        debug!(
            "Built season view v{}: {} gameweeks, {} scored, {} completed",
            snapshot.version,
            gameweeks.len(),
            global_scores.len(),
            completed_scores.len()
        );

        Self {
            version: snapshot.version,
            current_gw: snapshot.current_gw,
            names: NameBook::from_users(&snapshot.users),
            gameweeks,
            global_scores,
            completed_scores,
        }
    }

    pub fn gameweek(&self, gw: Gameweek) -> Option<&GameweekFacts> {
        self.gameweeks.get(&gw)
    }

    /// Gameweeks in ascending order
    pub fn gameweeks(&self) -> impl Iterator<Item = &GameweekFacts> + '_ {
        self.gameweeks.values()
    }

    /// Fully decided gameweeks before the current one, ascending
    pub fn completed_gws(&self) -> Vec<Gameweek> {
        self.gameweeks
            .values()
            .filter(|g| g.fully_decided && g.gw < self.current_gw)
            .map(|g| g.gw)
            .collect()
    }

    /// Global-population scores of a gameweek; empty when nobody submitted
    pub fn scores(&self, gw: Gameweek) -> &[GwScore] {
        self.global_scores.get(&gw).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn global_scores(&self) -> &BTreeMap<Gameweek, Vec<GwScore>> {
        &self.global_scores
    }

    /// Global scores of completed gameweeks only; season and form aggregates read these
    pub fn completed_scores(&self) -> &BTreeMap<Gameweek, Vec<GwScore>> {
        &self.completed_scores
    }

    /// Gameweeks before the current one, ascending, decided or not
    pub fn past_gws(&self) -> Vec<Gameweek> {
        self.gameweeks.keys().copied().filter(|&gw| gw < self.current_gw).collect()
    }

    pub fn is_completed(&self, gw: Gameweek) -> bool {
        gw < self.current_gw && self.gameweeks.get(&gw).is_some_and(|g| g.fully_decided)
    }

    pub fn score_of(&self, gw: Gameweek, user_id: &str) -> Option<&GwScore> {
        self.scores(gw).iter().find(|s| s.user_id == user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Choice, LiveScore, LiveStatus, FixtureRef, MatchResult, Pick, Submission};
    use chrono::Utc;

    fn fixture(gw: u32, idx: u32) -> Fixture {
        Fixture {
            gw,
            fixture_index: idx,
            home_id: format!("H{idx}"),
            away_id: format!("A{idx}"),
            kickoff_time: Utc::now(),
        }
    }

    fn snapshot() -> FactSnapshot {
        FactSnapshot {
            version: 7,
            current_gw: 3,
            fixtures: vec![fixture(1, 0), fixture(1, 1), fixture(2, 0), fixture(3, 0)],
            results: vec![
                MatchResult { gw: 1, fixture_index: 0, outcome: Choice::Home },
                MatchResult { gw: 1, fixture_index: 1, outcome: Choice::Away },
            ],
            live_scores: vec![LiveScore {
                fixture_ref: FixtureRef { gw: 3, fixture_index: 0 },
                home_score: 1,
                away_score: 0,
                status: LiveStatus::InPlay,
            }],
            picks: vec![
                Pick { user_id: "a".into(), gw: 1, fixture_index: 0, choice: Choice::Home },
                Pick { user_id: "a".into(), gw: 1, fixture_index: 1, choice: Choice::Away },
                Pick { user_id: "b".into(), gw: 1, fixture_index: 0, choice: Choice::Home },
                Pick { user_id: "a".into(), gw: 3, fixture_index: 0, choice: Choice::Home },
            ],
            submissions: vec![
                Submission { user_id: "a".into(), gw: 1, submitted_at: Utc::now() },
                Submission { user_id: "a".into(), gw: 3, submitted_at: Utc::now() },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_completed_excludes_undecided_and_current() {
        let view = SeasonView::build(&snapshot(), &ScoringConfig::default());
        // gw 2 has no outcome, gw 3 is live and current
        assert_eq!(view.completed_gws(), vec![1]);
        assert!(view.gameweek(3).unwrap().fully_decided);
    }

    #[test]
    fn test_global_scores_are_gated() {
        let view = SeasonView::build(&snapshot(), &ScoringConfig::default());
        assert_eq!(view.scores(1).len(), 1);
        assert_eq!(view.score_of(1, "a").unwrap().correct_count, 2);
        assert!(view.score_of(1, "b").is_none());
        assert!(view.scores(2).is_empty());
    }

    #[test]
    fn test_completed_scores_skip_partial_gameweeks() {
        let view = SeasonView::build(&snapshot(), &ScoringConfig::default());
        // gw 3 has a score but is current
        assert_eq!(view.scores(3).len(), 1);
        assert_eq!(view.completed_scores().keys().copied().collect::<Vec<_>>(), vec![1]);
        assert_eq!(view.past_gws(), vec![1, 2]);
        assert!(view.is_completed(1));
        assert!(!view.is_completed(2));
        assert!(!view.is_completed(3));
    }

    #[test]
    fn test_live_gameweek_is_scored() {
        let view = SeasonView::build(&snapshot(), &ScoringConfig::default());
        assert_eq!(view.score_of(3, "a").unwrap().correct_count, 1);
    }
}
