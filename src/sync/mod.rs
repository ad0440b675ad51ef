pub mod goals;
pub mod matches;
pub mod teams;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::openligadb::MatchFeed;

use goals::reconcile_goals;
use matches::reconcile_matches;
use teams::reconcile_teams;

/// Row counts written by one sync run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncSummary {
    pub teams: usize,
    pub matches: usize,
    pub players: usize,
    pub goals: usize,
    pub skipped_goals: usize,
    pub current_matchday: u32,
}

/// Runs one fetch and the three write phases (teams → matches →
/// players/goals) strictly in order. A failing phase aborts the run;
/// phases already committed stay committed.
pub struct SyncEngine {
    feed: Arc<dyn MatchFeed>,
    db: Database,
    season: String,
    league: String,
    matchdays: u32,
}

impl SyncEngine {
    pub fn new(config: &Config, feed: Arc<dyn MatchFeed>, db: Database) -> Self {
        SyncEngine {
            feed,
            db,
            season: config.season.clone(),
            league: config.league.clone(),
            matchdays: config.matchdays,
        }
    }

    pub async fn run(&self) -> Result<SyncSummary> {
        info!(
            "Syncing {} {} ({} matchdays) from {}",
            self.league,
            self.season,
            self.matchdays,
            self.feed.name()
        );

        let matchdays = self
            .feed
            .fetch_matchdays(&self.season, &self.league, self.matchdays)
            .await
            .with_context(|| format!("Failed to fetch {} {}", self.league, self.season))?;

        let mut summary = SyncSummary::default();

        // Teams
        let known = self.db.known_team_ids()?;
        let teams = reconcile_teams(&matchdays, &known);
        summary.teams = self.db.upsert_teams(&teams).context("Team sync failed")?;
        info!("Teams: {} new, {} already stored", summary.teams, known.len());

        // Matches
        let matches = reconcile_matches(&matchdays);
        summary.matches = self
            .db
            .upsert_matches(&matches)
            .context("Match sync failed")?;
        info!("Matches: {} upserted", summary.matches);

        // Players + goals
        let rec = reconcile_goals(&matchdays);
        self.db
            .upsert_players_and_goals(&rec.players, &rec.goals)
            .context("Goal sync failed")?;
        summary.players = rec.players.len();
        summary.goals = rec.goals.len();
        summary.skipped_goals = rec.skipped;
        info!(
            "Goals: {} upserted for {} player(s), {} raw entries skipped",
            summary.goals, summary.players, summary.skipped_goals
        );

        summary.current_matchday = self.db.current_matchday()?;
        if let Some(top) = self.db.scorer_stats()?.first() {
            info!(
                "Top scorer: {} (player {}, team {}) with {} goal(s)",
                top.name, top.player_id, top.team_id, top.goals
            );
        }

        Ok(summary)
    }
}
