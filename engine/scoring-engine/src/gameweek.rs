//! Gameweek scoring
//!
//! Turns one gameweek's canonical outcomes and submission-gated picks into a
//! [`GwScore`] per participating user. Unicorns are scoped to the population
//! being scored and have to be recomputed for every population.

use crate::outcome::OutcomeMap;
use crate::types::{Choice, FixtureIndex, Gameweek, GwScore, Pick, Submission, UserId};
use std::collections::{BTreeMap, BTreeSet};
use tracing::warn;

/// Picks of one gameweek that survived submission gating, keyed by user
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameweekPicks {
    pub gw: Gameweek,
    entries: BTreeMap<UserId, BTreeMap<FixtureIndex, Choice>>,
}

impl GameweekPicks {
    /// Keep only picks of users who have submitted for `gw`.
    ///
    /// A submitter with no picks is still a participant. If the same fixture
    /// was picked twice the later record wins.
    pub fn gate(gw: Gameweek, picks: &[Pick], submissions: &[Submission]) -> Self {
        let mut entries: BTreeMap<UserId, BTreeMap<FixtureIndex, Choice>> = submissions
            .iter()
            .filter(|s| s.gw == gw)
            .map(|s| (s.user_id.clone(), BTreeMap::new()))
            .collect();

        for pick in picks.iter().filter(|p| p.gw == gw) {
            if let Some(user_picks) = entries.get_mut(&pick.user_id) {
                if let Some(previous) = user_picks.insert(pick.fixture_index, pick.choice) {
                    if previous != pick.choice {
                        warn!(
                            "Duplicate pick for user {} gw {} fixture {}, keeping latest",
                            pick.user_id, gw, pick.fixture_index
                        );
                    }
                }
            }
        }

        Self { gw, entries }
    }

    /// Users with a submission for this gameweek
    pub fn participants(&self) -> impl Iterator<Item = &UserId> + '_ {
        self.entries.keys()
    }

    pub fn participant_count(&self) -> usize {
        self.entries.len()
    }

    pub fn has_participant(&self, user_id: &str) -> bool {
        self.entries.contains_key(user_id)
    }

    pub fn choice(&self, user_id: &str, fixture_index: FixtureIndex) -> Option<Choice> {
        self.entries.get(user_id)?.get(&fixture_index).copied()
    }

    /// All picks of one user in fixture order
    pub fn user_picks(&self, user_id: &str) -> impl Iterator<Item = (FixtureIndex, Choice)> + '_ {
        self.entries
            .get(user_id)
            .into_iter()
            .flat_map(|picks| picks.iter().map(|(idx, c)| (*idx, *c)))
    }

    /// Every gated choice made on one fixture
    pub fn choices_for(&self, fixture_index: FixtureIndex) -> impl Iterator<Item = Choice> + '_ {
        self.entries.values().filter_map(move |picks| picks.get(&fixture_index).copied())
    }
}

/// The set of users one scoring pass ranks against
#[derive(Debug, Clone, PartialEq)]
pub enum Population {
    /// Everyone who submitted for the gameweek
    Global,
    /// A mini-league's member list
    League(BTreeSet<UserId>),
}

impl Population {
    pub fn league<I, S>(members: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<UserId>,
    {
        Population::League(members.into_iter().map(Into::into).collect())
    }

    pub fn contains(&self, user_id: &str) -> bool {
        match self {
            Population::Global => true,
            Population::League(members) => members.contains(user_id),
        }
    }

    /// Size used for the unicorn minimum
    pub fn size(&self, picks: &GameweekPicks) -> usize {
        match self {
            Population::Global => picks.participant_count(),
            Population::League(members) => members.len(),
        }
    }
}

/// Score every population member who submitted for the gameweek.
///
/// `correct_count` only looks at fixtures with a defined outcome. A decided
/// fixture that exactly one member picked correctly is a unicorn for that
/// member, provided the population has at least `min_population` users.
/// Output is ordered by user id.
pub fn score_gameweek(
    outcomes: &OutcomeMap,
    picks: &GameweekPicks,
    population: &Population,
    min_population: usize,
) -> Vec<GwScore> {
    let members: Vec<&UserId> = picks.participants().filter(|u| population.contains(u)).collect();

    let mut scores: BTreeMap<&UserId, GwScore> = members
        .iter()
        .map(|u| {
            (*u, GwScore { user_id: (*u).clone(), gw: picks.gw, correct_count: 0, unicorn_count: 0 })
        })
        .collect();

    let unicorns_allowed = population.size(picks) >= min_population;
    let mut correct_by: Vec<&UserId> = Vec::new();

    for (fixture_index, outcome) in outcomes.iter() {
        correct_by.clear();
        for user_id in &members {
            if picks.choice(user_id, fixture_index) == Some(outcome) {
                correct_by.push(*user_id);
            }
        }

        for user_id in &correct_by {
            if let Some(score) = scores.get_mut(*user_id) {
                score.correct_count += 1;
            }
        }

        if unicorns_allowed && correct_by.len() == 1 {
            if let Some(score) = scores.get_mut(correct_by[0]) {
                score.unicorn_count += 1;
            }
        }
    }

    scores.into_values().collect()
}
