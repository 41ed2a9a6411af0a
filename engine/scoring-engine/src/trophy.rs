//! Trophy cabinet
//!
//! Replays every completed gameweek and counts how often a user finished
//! first. Each check is a full recomputation as of that gameweek, so the
//! totals only depend on the snapshot, never on evaluation order.

use crate::leaderboard::{form_leaderboard, gameweek_leaderboard, season_leaderboard};
use crate::ranking::rank_of;
use crate::season::SeasonView;
use crate::types::{Gameweek, RankedEntry, UserId};
use crate::{LONG_FORM_WINDOW, SHORT_FORM_WINDOW};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrophyKind {
    Gameweek,
    ShortForm,
    LongForm,
    Season,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrophyEvent {
    pub gw: Gameweek,
    pub kind: TrophyKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrophyCabinet {
    pub user_id: UserId,
    pub gameweek: u32,
    pub form5: u32,
    pub form10: u32,
    pub season: u32,
    /// Every first place in gameweek order
    pub events: Vec<TrophyEvent>,
}

impl TrophyCabinet {
    pub fn total(&self) -> u32 {
        self.gameweek + self.form5 + self.form10 + self.season
    }
}

/// Leaders of every check as of one gameweek
#[derive(Debug, Clone, Default)]
pub struct GameweekStandings {
    pub gameweek: Vec<RankedEntry>,
    pub short_form: Vec<RankedEntry>,
    pub long_form: Vec<RankedEntry>,
    pub season: Vec<RankedEntry>,
}

/// Recompute all four rankings as they stood at the end of `gw`
pub fn standings_as_of(view: &SeasonView, gw: Gameweek) -> GameweekStandings {
    GameweekStandings {
        gameweek: gameweek_leaderboard(view, gw),
        short_form: form_leaderboard(view, gw, SHORT_FORM_WINDOW),
        long_form: form_leaderboard(view, gw, LONG_FORM_WINDOW),
        season: season_leaderboard(view, gw),
    }
}

/// Count every completed gameweek in which `user_id` ranked first.
///
/// Sharing first place counts.
pub fn build_trophy_cabinet(view: &SeasonView, user_id: &str) -> TrophyCabinet {
    let mut cabinet = TrophyCabinet {
        user_id: user_id.to_string(),
        gameweek: 0,
        form5: 0,
        form10: 0,
        season: 0,
        events: Vec::new(),
    };

    for gw in view.completed_gws() {
        let standings = standings_as_of(view, gw);
        let checks = [
            (TrophyKind::Gameweek, &standings.gameweek),
            (TrophyKind::ShortForm, &standings.short_form),
            (TrophyKind::LongForm, &standings.long_form),
            (TrophyKind::Season, &standings.season),
        ];

        for (kind, entries) in checks {
            if rank_of(entries, user_id) != Some(1) {
                continue;
            }
            match kind {
                TrophyKind::Gameweek => cabinet.gameweek += 1,
                TrophyKind::ShortForm => cabinet.form5 += 1,
                TrophyKind::LongForm => cabinet.form10 += 1,
                TrophyKind::Season => cabinet.season += 1,
            }
            cabinet.events.push(TrophyEvent { gw, kind });
        }
    }

    cabinet
}
