use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// One match object as returned by `getmatchdata/<league>/<season>`.
#[derive(Debug, Clone, Deserialize)]
pub struct RawMatch {
    #[serde(rename = "MatchID")]
    pub match_id: i64,
    #[serde(rename = "MatchDateTimeUTC")]
    pub kickoff: DateTime<Utc>,
    #[serde(rename = "MatchIsFinished", default, deserialize_with = "null_as_default")]
    pub finished: bool,
    #[serde(rename = "Group")]
    pub group: RawGroup,
    #[serde(rename = "Team1")]
    pub team1: RawTeam,
    #[serde(rename = "Team2")]
    pub team2: RawTeam,
    /// Ordered result snapshots: index 0 is half time, index 1 full time.
    #[serde(rename = "MatchResults", default, deserialize_with = "null_as_default")]
    pub results: Vec<RawResult>,
    #[serde(rename = "Goals", default, deserialize_with = "null_as_default")]
    pub goals: Vec<RawGoal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawGroup {
    /// 1-based matchday ordinal
    #[serde(rename = "GroupOrderID")]
    pub order_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTeam {
    #[serde(rename = "TeamId")]
    pub team_id: i64,
    #[serde(rename = "TeamName")]
    pub name: String,
    #[serde(rename = "ShortName", default, deserialize_with = "null_as_default")]
    pub short_name: String,
    #[serde(rename = "TeamIconUrl", default, deserialize_with = "null_as_default")]
    pub icon_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawResult {
    #[serde(rename = "PointsTeam1", default)]
    pub points_team1: Option<i32>,
    #[serde(rename = "PointsTeam2", default)]
    pub points_team2: Option<i32>,
}

/// A goal entry. Every field is optional on the wire; validation happens in
/// the goal reconciler so one bad entry never fails the whole payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGoal {
    #[serde(rename = "GoalID", default)]
    pub goal_id: Option<i64>,
    #[serde(rename = "GoalGetterID", default)]
    pub scorer_id: Option<i64>,
    #[serde(rename = "GoalGetterName", default)]
    pub scorer_name: Option<String>,
    #[serde(rename = "ScoreTeam1", default)]
    pub score_team1: Option<i32>,
    #[serde(rename = "ScoreTeam2", default)]
    pub score_team2: Option<i32>,
    #[serde(rename = "MatchMinute", default)]
    pub minute: Option<i32>,
    #[serde(rename = "IsPenalty", default)]
    pub is_penalty: Option<bool>,
    #[serde(rename = "IsOwnGoal", default)]
    pub is_own_goal: Option<bool>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
