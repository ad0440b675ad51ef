use crate::db::models::Match;
use crate::openligadb::RawMatch;

/// `(home, away)`; either side is `None` until the period is reported
pub type ScorePair = (Option<i32>, Option<i32>);

/// Half-time and full-time scores.
///
/// Full time falls back to half time until the second result is reported,
/// so a match with a half-time result never has an empty full-time score.
pub fn result_snapshots(raw: &RawMatch) -> (ScorePair, ScorePair) {
    let halftime = raw
        .results
        .first()
        .map(|r| (r.points_team1, r.points_team2))
        .unwrap_or((None, None));
    let fulltime = raw
        .results
        .get(1)
        .map(|r| (r.points_team1, r.points_team2))
        .unwrap_or(halftime);
    (halftime, fulltime)
}

pub fn normalize_match(raw: &RawMatch, matchday: u32) -> Match {
    let ((home_ht, away_ht), (home_ft, away_ft)) = result_snapshots(raw);
    Match {
        id: raw.match_id,
        matchday,
        home_team_id: raw.team1.team_id,
        away_team_id: raw.team2.team_id,
        home_halftime_score: home_ht,
        away_halftime_score: away_ht,
        home_fulltime_score: home_ft,
        away_fulltime_score: away_ft,
        kickoff: raw.kickoff,
        finished: raw.finished,
    }
}

/// One row per match; bucket index 0 is matchday 1.
pub fn reconcile_matches(matchdays: &[Vec<RawMatch>]) -> Vec<Match> {
    matchdays
        .iter()
        .zip(1u32..)
        .flat_map(|(day, matchday)| day.iter().map(move |raw| normalize_match(raw, matchday)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn raw_match(id: i64, results: Value) -> RawMatch {
        serde_json::from_value(json!({
            "MatchID": id,
            "MatchDateTimeUTC": "2017-08-19T13:30:00Z",
            "MatchIsFinished": false,
            "Group": { "GroupOrderID": 1 },
            "Team1": { "TeamId": 40, "TeamName": "Bayern München" },
            "Team2": { "TeamId": 6, "TeamName": "Bayer 04 Leverkusen" },
            "MatchResults": results
        }))
        .unwrap()
    }

    #[test]
    fn test_no_results_means_no_scores() {
        let m = normalize_match(&raw_match(1, json!([])), 1);
        assert_eq!(m.home_halftime_score, None);
        assert_eq!(m.away_halftime_score, None);
        assert_eq!(m.home_fulltime_score, None);
        assert_eq!(m.away_fulltime_score, None);
    }

    #[test]
    fn test_fulltime_falls_back_to_halftime() {
        let m = normalize_match(
            &raw_match(1, json!([{ "PointsTeam1": 1, "PointsTeam2": 0 }])),
            1,
        );
        assert_eq!(m.home_halftime_score, Some(1));
        assert_eq!(m.away_halftime_score, Some(0));
        assert_eq!(m.home_fulltime_score, Some(1));
        assert_eq!(m.away_fulltime_score, Some(0));
    }

    #[test]
    fn test_both_results_reported() {
        let m = normalize_match(
            &raw_match(
                1,
                json!([
                    { "PointsTeam1": 1, "PointsTeam2": 0 },
                    { "PointsTeam1": 3, "PointsTeam2": 2 }
                ]),
            ),
            1,
        );
        assert_eq!((m.home_halftime_score, m.away_halftime_score), (Some(1), Some(0)));
        assert_eq!((m.home_fulltime_score, m.away_fulltime_score), (Some(3), Some(2)));
        assert_eq!(m.home_team_id, 40);
        assert_eq!(m.away_team_id, 6);
    }

    #[test]
    fn test_matchday_is_bucket_index_plus_one() {
        let matchdays = vec![
            vec![raw_match(1, json!([]))],
            vec![],
            vec![raw_match(2, json!([])), raw_match(3, json!([]))],
        ];
        let rows = reconcile_matches(&matchdays);
        let days: Vec<(i64, u32)> = rows.iter().map(|m| (m.id, m.matchday)).collect();
        assert_eq!(days, vec![(1, 1), (2, 3), (3, 3)]);
    }
}
