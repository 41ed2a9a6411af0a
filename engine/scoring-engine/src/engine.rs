//! Scoring engine facade
//!
//! Wraps the pure computations with the memo layer. Every table is cached
//! against the snapshot version it was computed from.

use crate::chaos::{analyze_chaos, team_affinity, ChaosStats, TeamAffinity};
use crate::config::ScoringConfig;
use crate::error::{Result, ScoringError};
use crate::leaderboard::{form_leaderboard, gameweek_leaderboard, season_leaderboard};
use crate::loader::FactLoader;
use crate::memo::{CacheScope, CacheStats, TableCache};
use crate::mini_league::{build_all_league_tables, build_league_table, LeagueTable};
use crate::profile::{build_profile, PlayerProfile};
use crate::season::SeasonView;
use crate::trophy::{build_trophy_cabinet, TrophyCabinet};
use crate::types::{FactSnapshot, Gameweek, RankedEntry, UserId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Chaos statistics and team affinity for one user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChaosReport {
    pub user_id: UserId,
    pub chaos: ChaosStats,
    pub affinity: TeamAffinity,
}

pub struct ScoringEngine {
    config: ScoringConfig,
    seasons: TableCache<SeasonView>,
    leaderboards: TableCache<Vec<RankedEntry>>,
    league_tables: TableCache<LeagueTable>,
    all_league_tables: TableCache<Vec<LeagueTable>>,
    trophies: TableCache<TrophyCabinet>,
    profiles: TableCache<PlayerProfile>,
    chaos: TableCache<ChaosReport>,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        let cap = config.memo_max_entries;
        info!("Scoring engine initialized (memo capacity {} per table)", cap);
        Self {
            config,
            seasons: TableCache::new(cap),
            leaderboards: TableCache::new(cap),
            league_tables: TableCache::new(cap),
            all_league_tables: TableCache::new(cap),
            trophies: TableCache::new(cap),
            profiles: TableCache::new(cap),
            chaos: TableCache::new(cap),
        }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Load a snapshot through `loader`, propagating its failure
    pub fn load(&self, loader: &dyn FactLoader) -> Result<FactSnapshot> {
        let snapshot = loader.load()?;
        debug!("Snapshot v{} ready, current gameweek {}", snapshot.version, snapshot.current_gw);
        Ok(snapshot)
    }

    pub fn season_view(&self, snapshot: &FactSnapshot) -> Arc<SeasonView> {
        self.seasons.get_or_compute(CacheScope::Season, snapshot.version, || {
            SeasonView::build(snapshot, &self.config)
        })
    }

    pub fn gameweek_leaderboard(&self, snapshot: &FactSnapshot, gw: Gameweek) -> Arc<Vec<RankedEntry>> {
        let view = self.season_view(snapshot);
        self.leaderboards
            .get_or_compute(CacheScope::GameweekLeaderboard(gw), snapshot.version, || {
                gameweek_leaderboard(&view, gw)
            })
    }

    pub fn season_leaderboard(&self, snapshot: &FactSnapshot, up_to: Gameweek) -> Arc<Vec<RankedEntry>> {
        let view = self.season_view(snapshot);
        self.leaderboards
            .get_or_compute(CacheScope::SeasonLeaderboard(up_to), snapshot.version, || {
                season_leaderboard(&view, up_to)
            })
    }

    pub fn form_leaderboard(
        &self,
        snapshot: &FactSnapshot,
        end_gw: Gameweek,
        length: u32,
    ) -> Arc<Vec<RankedEntry>> {
        let view = self.season_view(snapshot);
        let scope = CacheScope::FormLeaderboard { end_gw, length };
        self.leaderboards.get_or_compute(scope, snapshot.version, || {
            form_leaderboard(&view, end_gw, length)
        })
    }

    pub fn league_table(&self, snapshot: &FactSnapshot, league_id: &str) -> Result<Arc<LeagueTable>> {
        let league = snapshot
            .league(league_id)
            .ok_or_else(|| ScoringError::LeagueNotFound(league_id.to_string()))?;
        let view = self.season_view(snapshot);
        let scope = CacheScope::LeagueTable(league_id.to_string());
        Ok(self.league_tables.get_or_compute(scope, snapshot.version, || {
            let members = snapshot.league_members(league_id);
            build_league_table(&view, league, &members, &self.config)
        }))
    }

    pub fn league_tables(&self, snapshot: &FactSnapshot) -> Arc<Vec<LeagueTable>> {
        let view = self.season_view(snapshot);
        self.all_league_tables.get_or_compute(CacheScope::AllLeagueTables, snapshot.version, || {
            build_all_league_tables(&view, snapshot, &self.config)
        })
    }

    pub fn trophy_cabinet(&self, snapshot: &FactSnapshot, user_id: &str) -> Arc<TrophyCabinet> {
        let view = self.season_view(snapshot);
        self.trophies
            .get_or_compute(CacheScope::Trophies(user_id.to_string()), snapshot.version, || {
                build_trophy_cabinet(&view, user_id)
            })
    }

    pub fn profile(&self, snapshot: &FactSnapshot, user_id: &str) -> Arc<PlayerProfile> {
        let view = self.season_view(snapshot);
        self.profiles
            .get_or_compute(CacheScope::Profile(user_id.to_string()), snapshot.version, || {
                build_profile(&view, user_id, &self.config)
            })
    }

    pub fn chaos_report(&self, snapshot: &FactSnapshot, user_id: &str) -> Arc<ChaosReport> {
        let view = self.season_view(snapshot);
        self.chaos.get_or_compute(CacheScope::Chaos(user_id.to_string()), snapshot.version, || {
            ChaosReport {
                user_id: user_id.to_string(),
                chaos: analyze_chaos(&view, user_id, self.config.chaos_threshold_pct),
                affinity: team_affinity(&view, user_id, self.config.team_affinity_min_tallies),
            }
        })
    }

    /// Season view cache counters
    pub fn cache_stats(&self) -> CacheStats {
        self.seasons.stats()
    }

    /// Drop every cached table
    pub fn clear_caches(&self) {
        self.seasons.clear();
        self.leaderboards.clear();
        self.league_tables.clear();
        self.all_league_tables.clear();
        self.trophies.clear();
        self.profiles.clear();
        self.chaos.clear();
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::InMemoryLoader;
    use crate::types::{Choice, Fixture, League, LeagueMembership, MatchResult, Pick, Submission};
    use chrono::Utc;

    fn snapshot(version: u64, outcome: Choice) -> FactSnapshot {
        let mut s = FactSnapshot {
            version,
            current_gw: 2,
            leagues: vec![League { league_id: "l1".into(), name: "Office".into(), start_gw: 1 }],
            ..Default::default()
        };
        s.fixtures.push(Fixture {
            gw: 1,
            fixture_index: 0,
            home_id: "NEW".into(),
            away_id: "WHU".into(),
            kickoff_time: Utc::now(),
        });
        s.results.push(MatchResult { gw: 1, fixture_index: 0, outcome });
        for (user, choice) in [("a", Choice::Home), ("b", Choice::Away)] {
            s.submissions.push(Submission { user_id: user.into(), gw: 1, submitted_at: Utc::now() });
            s.picks.push(Pick { user_id: user.into(), gw: 1, fixture_index: 0, choice });
            s.memberships.push(LeagueMembership { league_id: "l1".into(), user_id: user.into() });
        }
        s
    }

    #[test]
    fn test_cached_within_version() {
        let engine = ScoringEngine::default();
        let s = snapshot(1, Choice::Home);
        let first = engine.gameweek_leaderboard(&s, 1);
        let second = engine.gameweek_leaderboard(&s, 1);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first[0].subject_id, "a");
        assert_eq!(engine.cache_stats().hits, 1);
    }

    #[test]
    fn test_new_version_recomputes() {
        let engine = ScoringEngine::default();
        let before = engine.league_table(&snapshot(1, Choice::Home), "l1").unwrap();
        let after = engine.league_table(&snapshot(2, Choice::Away), "l1").unwrap();
        assert_eq!(before.rows[0].user_id, "a");
        assert_eq!(after.rows[0].user_id, "b");
    }

    #[test]
    fn test_unknown_league_is_an_error() {
        let engine = ScoringEngine::default();
        let result = engine.league_table(&snapshot(1, Choice::Home), "nope");
        assert!(matches!(result, Err(ScoringError::LeagueNotFound(id)) if id == "nope"));
    }

    #[test]
    fn test_load_through_loader() {
        let engine = ScoringEngine::default();
        let loaded = engine.load(&InMemoryLoader::new(snapshot(9, Choice::Draw))).unwrap();
        assert_eq!(loaded.version, 9);
        let report = engine.chaos_report(&loaded, "a");
        assert_eq!(report.chaos.decided_picks, 1);
        let cabinet = engine.trophy_cabinet(&loaded, "a");
        // nobody right: both share first place
        assert_eq!(cabinet.gameweek, 1);
    }
}
