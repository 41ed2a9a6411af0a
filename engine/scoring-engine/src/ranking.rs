//! Standard competition ranking and percentiles
//!
//! Entries sharing a primary score share a rank and the next distinct score
//! skips ahead (1, 1, 1, 4). Tie-break keys only decide display order inside
//! a group of equal scores, never the rank itself.

use crate::types::{RankedEntry, UserId};
use std::cmp::Ordering;

/// Percentile reported for an empty population
pub const NEUTRAL_PERCENTILE: f64 = 50.0;

/// An item with its competition rank
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    pub item: T,
    pub rank: u32,
    pub tied: bool,
}

/// Rank `items` by `score` descending, ordering equal scores with `tie_break`.
pub fn rank_by<T, S, C>(mut items: Vec<T>, score: S, tie_break: C) -> Vec<Ranked<T>>
where
    S: Fn(&T) -> i64,
    C: Fn(&T, &T) -> Ordering,
{
    items.sort_by(|a, b| score(b).cmp(&score(a)).then_with(|| tie_break(a, b)));

    let scores: Vec<i64> = items.iter().map(&score).collect();
    let mut ranks: Vec<u32> = Vec::with_capacity(scores.len());
    let mut group_start = 0;
    for (idx, value) in scores.iter().enumerate() {
        if *value != scores[group_start] {
            group_start = idx;
        }
        ranks.push(group_start as u32 + 1);
    }

    let mut ranked = Vec::with_capacity(ranks.len());
    for (idx, item) in items.into_iter().enumerate() {
        let rank = ranks[idx];
        let tied = (idx > 0 && ranks[idx - 1] == rank)
            || ranks.get(idx + 1).is_some_and(|&next| next == rank);
        ranked.push(Ranked { item, rank, tied });
    }

    ranked
}

/// `round2(100 * count(x <= value) / |population|)`, or 50 for an empty population
pub fn percentile(value: f64, population: &[f64]) -> f64 {
    if population.is_empty() {
        return NEUTRAL_PERCENTILE;
    }
    let at_or_below = population.iter().filter(|&&x| x <= value).count();
    round2(100.0 * at_or_below as f64 / population.len() as f64)
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// One row handed to [`rank_score_lines`]
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreLine {
    pub subject_id: UserId,
    pub name: String,
    pub value: u32,
    /// Secondary keys, compared descending in order, before the name
    pub tie_keys: Vec<u32>,
}

impl ScoreLine {
    pub fn new(subject_id: impl Into<UserId>, name: impl Into<String>, value: u32) -> Self {
        Self { subject_id: subject_id.into(), name: name.into(), value, tie_keys: Vec::new() }
    }

    pub fn with_tie_keys(mut self, keys: Vec<u32>) -> Self {
        self.tie_keys = keys;
        self
    }
}

/// Rank score lines into presentation rows with percentile attached.
///
/// Display order inside a tie: tie keys descending, then name ascending,
/// then subject id for determinism.
pub fn rank_score_lines(lines: Vec<ScoreLine>) -> Vec<RankedEntry> {
    let population: Vec<f64> = lines.iter().map(|l| l.value as f64).collect();

    rank_by(
        lines,
        |l| l.value as i64,
        |a, b| {
            b.tie_keys
                .cmp(&a.tie_keys)
                .then_with(|| a.name.cmp(&b.name))
                .then_with(|| a.subject_id.cmp(&b.subject_id))
        },
    )
    .into_iter()
    .map(|r| RankedEntry {
        percentile: percentile(r.item.value as f64, &population),
        subject_id: r.item.subject_id,
        name: r.item.name,
        value: r.item.value,
        rank: r.rank,
        tied: r.tied,
    })
    .collect()
}

/// Rank of a subject, `None` when it is not in the ranking
pub fn rank_of(entries: &[RankedEntry], subject_id: &str) -> Option<u32> {
    entries.iter().find(|e| e.subject_id == subject_id).map(|e| e.rank)
}
