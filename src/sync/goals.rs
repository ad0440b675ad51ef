//! Goal and scorer reconciliation.
//!
//! Upstream goal lists are unordered and contain corrections that repeat an
//! earlier score. The scoring side is not reported at all; it is inferred by
//! replaying the goals in minute order and watching which side's count
//! advances.

use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::db::models::{Goal, Player};
use crate::openligadb::{RawGoal, RawMatch};

/// Name stored for scorers the feed does not identify
pub const UNKNOWN_PLAYER_NAME: &str = "unknown";

/// Placeholder player id for an anonymous scorer of `team_id`.
///
/// Negative ids are reserved for these placeholders: one per team, and the
/// absolute value is the team id.
pub fn anonymous_player_id(team_id: i64) -> i64 {
    -team_id
}

/// Why a raw goal entry cannot be used
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GoalEventError {
    #[error("goal entry without GoalID")]
    MissingGoalId,
    #[error("goal {0} has no scorer id")]
    MissingScorerId(i64),
    #[error("goal {0} has no score")]
    MissingScore(i64),
    #[error("goal {0} has no minute")]
    MissingMinute(i64),
}

/// A structurally valid goal entry
#[derive(Debug, Clone, PartialEq, Eq)]
struct GoalEvent {
    id: i64,
    scorer_id: i64,
    scorer_name: String,
    home_score: i32,
    away_score: i32,
    minute: i32,
    penalty: bool,
    own_goal: bool,
}

impl TryFrom<&RawGoal> for GoalEvent {
    type Error = GoalEventError;

    fn try_from(raw: &RawGoal) -> Result<Self, Self::Error> {
        let id = raw.goal_id.ok_or(GoalEventError::MissingGoalId)?;
        let minute = raw.minute.ok_or(GoalEventError::MissingMinute(id))?;
        let scorer_id = raw.scorer_id.ok_or(GoalEventError::MissingScorerId(id))?;
        let (home_score, away_score) = match (raw.score_team1, raw.score_team2) {
            (Some(home), Some(away)) => (home, away),
            _ => return Err(GoalEventError::MissingScore(id)),
        };

        Ok(GoalEvent {
            id,
            scorer_id,
            scorer_name: raw.scorer_name.as_deref().unwrap_or("").trim().to_string(),
            home_score,
            away_score,
            minute,
            penalty: raw.is_penalty.unwrap_or(false),
            own_goal: raw.is_own_goal.unwrap_or(false),
        })
    }
}

/// Which side a goal counted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Home,
    Away,
}

/// Player and goal rows derived from one or more matches
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalReconciliation {
    pub players: Vec<Player>,
    pub goals: Vec<Goal>,
    /// Raw entries that did not become goals (malformed, repeated or
    /// unattributable)
    pub skipped: usize,
}

/// Resolve the scorer of a goal credited to `team_id`.
///
/// Scorer id 0 is the feed's "unknown"; it maps to the team's anonymous
/// player but keeps a name if one was supplied.
pub fn resolve_scorer(scorer_id: i64, scorer_name: &str, team_id: i64) -> Player {
    let id = if scorer_id == 0 {
        anonymous_player_id(team_id)
    } else {
        scorer_id
    };
    let name = match scorer_name.trim() {
        "" => UNKNOWN_PLAYER_NAME.to_string(),
        name => name.to_string(),
    };
    Player { id, team_id, name }
}

/// Turn one match's raw goal list into player and goal rows.
///
/// Entries are replayed in minute order (stable for equal minutes) against a
/// running score that starts at 0:0. An entry that leaves the running score
/// unchanged, or repeats the score of the last kept goal, is dropped;
/// otherwise the side whose count went up is credited.
pub fn reconcile_match_goals(
    match_id: i64,
    home_team_id: i64,
    away_team_id: i64,
    raw_goals: &[RawGoal],
) -> GoalReconciliation {
    let mut out = GoalReconciliation::default();

    let mut events: Vec<GoalEvent> = Vec::with_capacity(raw_goals.len());
    for raw in raw_goals {
        match GoalEvent::try_from(raw) {
            Ok(event) => events.push(event),
            Err(e) => {
                warn!("Match {}: skipping goal entry: {}", match_id, e);
                out.skipped += 1;
            }
        }
    }
    events.sort_by_key(|e| e.minute);

    let (mut running_home, mut running_away) = (0, 0);
    // Score of the last kept goal. Differs from the running score only after
    // an entry that jumped both sides at once.
    let mut last_kept = (0, 0);
    for event in events {
        let reported = (event.home_score, event.away_score);
        if reported == (running_home, running_away) || reported == last_kept {
            debug!(
                "Match {}: goal {} repeats {}:{}, dropped",
                match_id, event.id, event.home_score, event.away_score
            );
            out.skipped += 1;
            continue;
        }
        if event.home_score > running_home && event.away_score > running_away {
            warn!(
                "Match {}: goal {} jumps both sides from {}:{} to {}:{}, credited to home",
                match_id, event.id, running_home, running_away, event.home_score, event.away_score
            );
        }

        let side = if event.home_score > running_home {
            running_home = event.home_score;
            Side::Home
        } else if event.away_score > running_away {
            running_away = event.away_score;
            Side::Away
        } else {
            warn!(
                "Match {}: goal {} at {}:{} does not advance {}:{}, dropped",
                match_id, event.id, event.home_score, event.away_score, running_home, running_away
            );
            out.skipped += 1;
            continue;
        };

        last_kept = reported;

        let team_id = match side {
            Side::Home => home_team_id,
            Side::Away => away_team_id,
        };
        let player = resolve_scorer(event.scorer_id, &event.scorer_name, team_id);

        out.goals.push(Goal {
            id: event.id,
            match_id,
            player_id: player.id,
            minute: event.minute,
            home_score: event.home_score,
            away_score: event.away_score,
            penalty: event.penalty,
            own_goal: event.own_goal,
        });
        out.players.push(player);
    }

    out
}

/// Reconcile every match of the season. Players are deduplicated by id, the
/// latest occurrence winning.
pub fn reconcile_goals(matchdays: &[Vec<RawMatch>]) -> GoalReconciliation {
    let mut players: BTreeMap<i64, Player> = BTreeMap::new();
    let mut goals = Vec::new();
    let mut skipped = 0;

    for m in matchdays.iter().flatten() {
        let rec = reconcile_match_goals(m.match_id, m.team1.team_id, m.team2.team_id, &m.goals);
        for player in rec.players {
            players.insert(player.id, player);
        }
        goals.extend(rec.goals);
        skipped += rec.skipped;
    }

    GoalReconciliation {
        players: players.into_values().collect(),
        goals,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: i64 = 40;
    const AWAY: i64 = 42;

    fn goal(id: i64, minute: i32, home: i32, away: i32) -> RawGoal {
        RawGoal {
            goal_id: Some(id),
            scorer_id: Some(1000 + id),
            scorer_name: Some(format!("Player {}", id)),
            score_team1: Some(home),
            score_team2: Some(away),
            minute: Some(minute),
            is_penalty: Some(false),
            is_own_goal: Some(false),
        }
    }

    fn scorer_teams(rec: &GoalReconciliation) -> Vec<i64> {
        rec.goals
            .iter()
            .map(|g| {
                rec.players
                    .iter()
                    .find(|p| p.id == g.player_id)
                    .map(|p| p.team_id)
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn test_repeated_entry_is_dropped() {
        let raw = vec![goal(1, 5, 1, 0), goal(2, 5, 1, 0), goal(3, 20, 1, 1)];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let ids: Vec<i64> = rec.goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(scorer_teams(&rec), vec![HOME, AWAY]);
        assert_eq!(rec.skipped, 1);
    }

    #[test]
    fn test_entry_matching_kickoff_score_is_dropped() {
        let rec = reconcile_match_goals(7, HOME, AWAY, &[goal(1, 3, 0, 0)]);
        assert!(rec.goals.is_empty());
        assert!(rec.players.is_empty());
        assert_eq!(rec.skipped, 1);
    }

    #[test]
    fn test_goals_are_replayed_in_minute_order() {
        let raw = vec![goal(3, 80, 2, 1), goal(1, 10, 1, 0), goal(2, 55, 1, 1)];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let ids: Vec<i64> = rec.goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(scorer_teams(&rec), vec![HOME, AWAY, HOME]);
    }

    #[test]
    fn test_equal_minutes_keep_input_order() {
        let raw = vec![goal(9, 45, 1, 0), goal(4, 45, 1, 1)];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let ids: Vec<i64> = rec.goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![9, 4]);
        assert_eq!(scorer_teams(&rec), vec![HOME, AWAY]);
    }

    #[test]
    fn test_running_score_strictly_advances_one_side() {
        let raw = vec![
            goal(1, 12, 1, 0),
            goal(2, 12, 1, 0),
            goal(3, 30, 1, 1),
            goal(4, 61, 2, 1),
            goal(5, 61, 2, 1),
            goal(6, 88, 2, 2),
        ];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let (mut home, mut away) = (0, 0);
        for g in &rec.goals {
            let home_up = g.home_score > home && g.away_score == away;
            let away_up = g.away_score > away && g.home_score == home;
            assert!(home_up ^ away_up, "goal {} does not advance one side", g.id);
            home = g.home_score;
            away = g.away_score;
        }
        assert_eq!(rec.goals.len(), 4);
        assert_eq!(rec.skipped, 2);
    }

    #[test]
    fn test_repeat_of_both_sides_jump_is_dropped() {
        let raw = vec![goal(1, 10, 1, 1), goal(2, 20, 1, 1)];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let ids: Vec<i64> = rec.goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1]);
        assert_eq!(scorer_teams(&rec), vec![HOME]);
        assert_eq!(rec.skipped, 1);
    }

    #[test]
    fn test_goal_after_both_sides_jump_still_counts() {
        let raw = vec![goal(1, 10, 1, 1), goal(2, 20, 1, 1), goal(3, 70, 1, 2)];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let ids: Vec<i64> = rec.goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(scorer_teams(&rec), vec![HOME, AWAY]);
    }

    #[test]
    fn test_missing_minute_is_skipped() {
        let mut no_minute = goal(1, 0, 1, 0);
        no_minute.minute = None;
        let rec = reconcile_match_goals(7, HOME, AWAY, &[no_minute, goal(2, 50, 1, 0)]);

        assert_eq!(rec.goals.len(), 1);
        assert_eq!(rec.goals[0].id, 2);
        assert_eq!(rec.skipped, 1);
    }

    #[test]
    fn test_malformed_entries_do_not_abort_match() {
        let mut no_id = goal(1, 10, 1, 0);
        no_id.goal_id = None;
        let mut no_score = goal(2, 20, 1, 0);
        no_score.score_team2 = None;
        let mut no_scorer = goal(3, 30, 1, 0);
        no_scorer.scorer_id = None;

        let rec = reconcile_match_goals(7, HOME, AWAY, &[no_id, no_score, no_scorer, goal(4, 40, 0, 1)]);
        assert_eq!(rec.skipped, 3);
        assert_eq!(rec.goals.len(), 1);
        assert_eq!(scorer_teams(&rec), vec![AWAY]);
    }

    #[test]
    fn test_goal_event_errors_name_the_goal() {
        let mut raw = goal(11, 10, 1, 0);
        raw.minute = None;
        assert_eq!(
            GoalEvent::try_from(&raw),
            Err(GoalEventError::MissingMinute(11))
        );
        assert_eq!(
            GoalEvent::try_from(&RawGoal::default()),
            Err(GoalEventError::MissingGoalId)
        );
    }

    #[test]
    fn test_score_going_backwards_is_dropped_without_panicking() {
        let raw = vec![goal(1, 10, 2, 0), goal(2, 20, 1, 0), goal(3, 30, 2, 1)];
        let rec = reconcile_match_goals(7, HOME, AWAY, &raw);

        let ids: Vec<i64> = rec.goals.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(rec.skipped, 1);
    }

    #[test]
    fn test_anonymous_scorer_gets_team_placeholder() {
        let mut raw = goal(1, 10, 0, 1);
        raw.scorer_id = Some(0);
        raw.scorer_name = None;

        let rec = reconcile_match_goals(7, HOME, AWAY, &[raw]);
        assert_eq!(
            rec.players,
            vec![Player {
                id: -42,
                team_id: 42,
                name: "unknown".into()
            }]
        );
        assert_eq!(rec.goals[0].player_id, -42);
    }

    #[test]
    fn test_anonymous_scorer_keeps_supplied_name() {
        let player = resolve_scorer(0, "  Kramer ", HOME);
        assert_eq!(player.id, -HOME);
        assert_eq!(player.name, "Kramer");
    }

    #[test]
    fn test_known_scorer_with_blank_name() {
        let player = resolve_scorer(1499, "   ", AWAY);
        assert_eq!(player.id, 1499);
        assert_eq!(player.team_id, AWAY);
        assert_eq!(player.name, UNKNOWN_PLAYER_NAME);
    }

    #[test]
    fn test_flags_are_carried_over() {
        let mut raw = goal(1, 90, 1, 0);
        raw.is_penalty = Some(true);
        raw.is_own_goal = None;

        let rec = reconcile_match_goals(7, HOME, AWAY, &[raw]);
        assert!(rec.goals[0].penalty);
        assert!(!rec.goals[0].own_goal);
        assert_eq!(rec.goals[0].match_id, 7);
        assert_eq!(rec.goals[0].minute, 90);
    }
}
