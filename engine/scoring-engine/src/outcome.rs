//! Outcome resolution
//!
//! Merges stored settlement results with the live score feed into one
//! canonical outcome per fixture. A stored result always wins, so an outcome
//! can fluctuate while a match is live but never falls back to undefined once
//! the result lands.

use crate::types::{Choice, FixtureIndex, Gameweek, LiveScore, MatchResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Where a canonical outcome came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeSource {
    Result,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedOutcome {
    pub outcome: Choice,
    pub source: OutcomeSource,
}

/// Canonical outcomes for one gameweek; fixtures without a defined outcome are absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutcomeMap {
    pub gw: Gameweek,
    outcomes: BTreeMap<FixtureIndex, ResolvedOutcome>,
}

impl OutcomeMap {
    pub fn new(gw: Gameweek) -> Self {
        Self { gw, outcomes: BTreeMap::new() }
    }

    /// Canonical outcome of a fixture, `None` while undecided
    pub fn get(&self, fixture_index: FixtureIndex) -> Option<Choice> {
        self.outcomes.get(&fixture_index).map(|r| r.outcome)
    }

    pub fn resolved(&self, fixture_index: FixtureIndex) -> Option<&ResolvedOutcome> {
        self.outcomes.get(&fixture_index)
    }

    /// Whether the fixture is backed by a stored result
    pub fn is_settled(&self, fixture_index: FixtureIndex) -> bool {
        matches!(self.outcomes.get(&fixture_index), Some(r) if r.source == OutcomeSource::Result)
    }

    /// Decided fixtures in fixture order
    pub fn iter(&self) -> impl Iterator<Item = (FixtureIndex, Choice)> + '_ {
        self.outcomes.iter().map(|(idx, r)| (*idx, r.outcome))
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when every one of `fixture_indexes` has an outcome and there is at least one
    pub fn is_fully_decided<'a, I>(&self, fixture_indexes: I) -> bool
    where
        I: IntoIterator<Item = &'a FixtureIndex>,
    {
        let mut any = false;
        for idx in fixture_indexes {
            any = true;
            if !self.outcomes.contains_key(idx) {
                return false;
            }
        }
        any
    }

    fn insert(&mut self, fixture_index: FixtureIndex, resolved: ResolvedOutcome) {
        self.outcomes.insert(fixture_index, resolved);
    }
}

/// Resolve the canonical outcome of every fixture in `gw`.
///
/// Records for other gameweeks are ignored. Live scores only count once
/// play has started.
pub fn resolve_outcomes(gw: Gameweek, results: &[MatchResult], live_scores: &[LiveScore]) -> OutcomeMap {
    let mut map = OutcomeMap::new(gw);

    for live in live_scores.iter().filter(|l| l.fixture_ref.gw == gw) {
        if !live.status.has_started() {
            continue;
        }
        map.insert(
            live.fixture_ref.fixture_index,
            ResolvedOutcome {
                outcome: Choice::from_score(live.home_score, live.away_score),
                source: OutcomeSource::Live,
            },
        );
    }

    // Results override anything the live feed said
    for result in results.iter().filter(|r| r.gw == gw) {
        map.insert(
            result.fixture_index,
            ResolvedOutcome { outcome: result.outcome, source: OutcomeSource::Result },
        );
    }

    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FixtureRef, LiveStatus};

    fn live(fixture_index: u32, home: u32, away: u32, status: LiveStatus) -> LiveScore {
        LiveScore {
            fixture_ref: FixtureRef { gw: 1, fixture_index },
            home_score: home,
            away_score: away,
            status,
        }
    }

    fn result(fixture_index: u32, outcome: Choice) -> MatchResult {
        MatchResult { gw: 1, fixture_index, outcome }
    }

    #[test]
    fn test_result_preferred_over_live() {
        let map = resolve_outcomes(
            1,
            &[result(0, Choice::Away)],
            &[live(0, 3, 0, LiveStatus::Finished)],
        );
        assert_eq!(map.get(0), Some(Choice::Away));
        assert!(map.is_settled(0));
    }

    #[test]
    fn test_live_derived_outcomes() {
        let map = resolve_outcomes(
            1,
            &[],
            &[
                live(0, 2, 1, LiveStatus::InPlay),
                live(1, 0, 0, LiveStatus::Paused),
                live(2, 1, 4, LiveStatus::Finished),
            ],
        );
        assert_eq!(map.get(0), Some(Choice::Home));
        assert_eq!(map.get(1), Some(Choice::Draw));
        assert_eq!(map.get(2), Some(Choice::Away));
        assert!(!map.is_settled(0));
    }

    #[test]
    fn test_scheduled_is_undefined() {
        let map = resolve_outcomes(1, &[], &[live(0, 0, 0, LiveStatus::Scheduled)]);
        assert_eq!(map.get(0), None);
        assert!(map.is_empty());
    }

    #[test]
    fn test_other_gameweeks_ignored() {
        let other = MatchResult { gw: 2, fixture_index: 0, outcome: Choice::Home };
        let map = resolve_outcomes(1, &[other], &[]);
        assert_eq!(map.get(0), None);
    }

    #[test]
    fn test_result_does_not_regress_when_live_resets() {
        // The live feed may drop back to Scheduled after a postponement glitch
        let map = resolve_outcomes(
            1,
            &[result(0, Choice::Draw)],
            &[live(0, 0, 0, LiveStatus::Scheduled)],
        );
        assert_eq!(map.get(0), Some(Choice::Draw));
    }

    #[test]
    fn test_fully_decided() {
        let map = resolve_outcomes(1, &[result(0, Choice::Home), result(1, Choice::Draw)], &[]);
        assert!(map.is_fully_decided(&[0, 1]));
        assert!(!map.is_fully_decided(&[0, 1, 2]));
        assert!(!map.is_fully_decided(&[]));
    }
}
