use chrono::{DateTime, Utc};

/// A club, keyed by its upstream OpenLigaDB team id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Team {
    pub id: i64,
    pub name: String,
    pub short_name: String,
    /// Three-letter code, e.g. "FCB"
    pub abbreviation: String,
    pub icon_url: String,
}

/// A fixture with its half-time and full-time snapshots
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub id: i64,
    /// 1-based matchday
    pub matchday: u32,
    pub home_team_id: i64,
    pub away_team_id: i64,
    pub home_halftime_score: Option<i32>,
    pub away_halftime_score: Option<i32>,
    /// Falls back to the half-time score until full time is reported
    pub home_fulltime_score: Option<i32>,
    pub away_fulltime_score: Option<i32>,
    pub kickoff: DateTime<Utc>,
    pub finished: bool,
}

/// A goal scorer.
///
/// Anonymous scorers share one row per team with id `-team_id`; a negative id
/// always means "unknown player of team `|id|`".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    pub id: i64,
    pub team_id: i64,
    pub name: String,
}

/// One genuine scoring event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Goal {
    pub id: i64,
    pub match_id: i64,
    pub player_id: i64,
    pub minute: i32,
    /// Score after this goal
    pub home_score: i32,
    pub away_score: i32,
    pub penalty: bool,
    pub own_goal: bool,
}

/// Per-player goal tallies, computed from the goals table on demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScorerStats {
    pub player_id: i64,
    pub team_id: i64,
    pub name: String,
    pub goals: i64,
    pub penalties: i64,
    pub own_goals: i64,
}
