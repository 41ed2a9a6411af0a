//! Mini-league tables
//!
//! Each relevant gameweek is a contest between league members: the member(s)
//! with the best `(correct, unicorns)` pair win it. Unicorns are computed with
//! the league as the population, independent of the global scores.

use crate::config::ScoringConfig;
use crate::gameweek::{score_gameweek, Population};
use crate::season::SeasonView;
use crate::types::{FactSnapshot, Gameweek, League, LeagueId, UserId};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// One row of a league table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTableRow {
    /// Dense 1-based position in table order
    pub position: u32,
    pub user_id: UserId,
    pub name: String,
    pub mlt_pts: u32,
    pub wins: u32,
    pub draws: u32,
    pub played: u32,
    pub ocp: u32,
    pub unicorns: u32,
    /// One of `W`, `D`, `L` per relevant gameweek, oldest first
    pub form: String,
}

/// Who took a gameweek inside the league
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GwOutcome {
    pub gw: Gameweek,
    pub winners: Vec<UserId>,
    pub drawn: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueTable {
    pub league_id: LeagueId,
    pub name: String,
    pub start_gw: Gameweek,
    pub relevant_gws: Vec<Gameweek>,
    pub rows: Vec<LeagueTableRow>,
    pub gw_outcomes: Vec<GwOutcome>,
}

impl LeagueTable {
    pub fn row(&self, user_id: &str) -> Option<&LeagueTableRow> {
        self.rows.iter().find(|r| r.user_id == user_id)
    }
}

/// Fully decided gameweeks in `[start_gw, current_gw)`
pub fn relevant_gameweeks(view: &SeasonView, start_gw: Gameweek) -> Vec<Gameweek> {
    view.completed_gws().into_iter().filter(|&gw| gw >= start_gw).collect()
}

#[derive(Default)]
struct Tally {
    mlt_pts: u32,
    wins: u32,
    draws: u32,
    played: u32,
    ocp: u32,
    unicorns: u32,
    form: String,
}

/// Build the standings of one league.
///
/// Members without a submission for a relevant gameweek take part in it
/// with `(0, 0)`.
pub fn build_league_table(
    view: &SeasonView,
    league: &League,
    members: &[UserId],
    config: &ScoringConfig,
) -> LeagueTable {
    let relevant_gws = relevant_gameweeks(view, league.start_gw);
    let population = Population::league(members.iter().cloned());

    let mut tallies: HashMap<&str, Tally> =
        members.iter().map(|m| (m.as_str(), Tally::default())).collect();
    let mut gw_outcomes = Vec::with_capacity(relevant_gws.len());

    for &gw in &relevant_gws {
        let Some(facts) = view.gameweek(gw) else { continue };

        let scored: HashMap<UserId, (u32, u32)> =
            score_gameweek(&facts.outcomes, &facts.picks, &population, config.unicorn_min_population)
                .into_iter()
                .map(|s| (s.user_id, (s.correct_count, s.unicorn_count)))
                .collect();
        let pair_of = |user: &str| scored.get(user).copied().unwrap_or((0, 0));

        let Some(top) = members.iter().map(|m| pair_of(m.as_str())).max() else { continue };
        let winners: Vec<UserId> = members.iter().filter(|m| pair_of(m.as_str()) == top).cloned().collect();
        let drawn = winners.len() > 1;

        for member in members {
            let (correct, unicorns) = pair_of(member.as_str());
            let Some(tally) = tallies.get_mut(member.as_str()) else { continue };
            tally.played += 1;
            tally.ocp += correct;
            tally.unicorns += unicorns;

            if winners.contains(member) {
                if drawn {
                    tally.mlt_pts += config.league_draw_points;
                    tally.draws += 1;
                    tally.form.push('D');
                } else {
                    tally.mlt_pts += config.league_win_points;
                    tally.wins += 1;
                    tally.form.push('W');
                }
            } else {
                tally.form.push('L');
            }
        }

        gw_outcomes.push(GwOutcome { gw, winners, drawn });
    }

    let mut rows: Vec<LeagueTableRow> = tallies
        .into_iter()
        .map(|(user_id, t)| LeagueTableRow {
            position: 0,
            user_id: user_id.to_string(),
            name: view.names.name_of(user_id).to_string(),
            mlt_pts: t.mlt_pts,
            wins: t.wins,
            draws: t.draws,
            played: t.played,
            ocp: t.ocp,
            unicorns: t.unicorns,
            form: t.form,
        })
        .collect();

    rows.sort_by(|a, b| {
        b.mlt_pts
            .cmp(&a.mlt_pts)
            .then_with(|| b.unicorns.cmp(&a.unicorns))
            .then_with(|| b.ocp.cmp(&a.ocp))
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.user_id.cmp(&b.user_id))
    });
    for (idx, row) in rows.iter_mut().enumerate() {
        row.position = idx as u32 + 1;
    }

    debug!(
        "League {} table: {} members over {} relevant gameweeks",
        league.league_id,
        rows.len(),
        relevant_gws.len()
    );

    LeagueTable {
        league_id: league.league_id.clone(),
        name: league.name.clone(),
        start_gw: league.start_gw,
        relevant_gws,
        rows,
        gw_outcomes,
    }
}

/// Build every league of the snapshot in parallel, in snapshot league order
pub fn build_all_league_tables(
    view: &SeasonView,
    snapshot: &FactSnapshot,
    config: &ScoringConfig,
) -> Vec<LeagueTable> {
    snapshot
        .leagues
        .par_iter()
        .map(|league| {
            let members = snapshot.league_members(&league.league_id);
            build_league_table(view, league, &members, config)
        })
        .collect()
}
