use anyhow::{Context, Result};
use rusqlite::{params, Connection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

pub mod models;
use models::*;

/// Shared SQLite handle (single connection with mutex)
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open (or create) the SQLite database at the given path
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open database {}", path))?;
        Self::from_connection(conn)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        let db = Database {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.create_tables()?;
        Ok(db)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("database connection mutex poisoned"))
    }

    /// Create tables if absent (idempotent, no migrations)
    fn create_tables(&self) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(SCHEMA_SQL)
            .context("Failed to create database tables")?;
        Ok(())
    }

    // ── Teams ────────────────────────────────────────────────────────────────

    /// Ids of every team already stored
    pub fn known_team_ids(&self) -> Result<HashSet<i64>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id FROM teams")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<HashSet<i64>>>()?;
        Ok(ids)
    }

    /// Upsert a batch of teams in one transaction
    pub fn upsert_teams(&self, teams: &[Team]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO teams (id, name, shortname, abbreviation, icon)
                 VALUES (?1,?2,?3,?4,?5)
                 ON CONFLICT(id) DO UPDATE SET
                    name=excluded.name,
                    shortname=excluded.shortname,
                    abbreviation=excluded.abbreviation,
                    icon=excluded.icon",
            )?;
            for team in teams {
                stmt.execute(params![
                    team.id,
                    team.name,
                    team.short_name,
                    team.abbreviation,
                    team.icon_url,
                ])
                .with_context(|| format!("Failed to upsert team {}", team.id))?;
            }
        }
        tx.commit()?;
        Ok(teams.len())
    }

    #[allow(dead_code)] // read-back for tests and manual inspection
    pub fn list_teams(&self) -> Result<Vec<Team>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, shortname, abbreviation, icon FROM teams ORDER BY id",
        )?;
        let teams = stmt
            .query_map([], map_team)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(teams)
    }

    // ── Matches ──────────────────────────────────────────────────────────────

    /// Upsert a batch of matches in one transaction. Scores, kickoff and the
    /// finished flag are always overwritten.
    pub fn upsert_matches(&self, matches: &[Match]) -> Result<usize> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO matches (id, home_id, away_id, matchday,
                                      home_ht_score, away_ht_score,
                                      home_ft_score, away_ft_score,
                                      kickoff, finished)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10)
                 ON CONFLICT(id) DO UPDATE SET
                    home_id=excluded.home_id,
                    away_id=excluded.away_id,
                    matchday=excluded.matchday,
                    home_ht_score=excluded.home_ht_score,
                    away_ht_score=excluded.away_ht_score,
                    home_ft_score=excluded.home_ft_score,
                    away_ft_score=excluded.away_ft_score,
                    kickoff=excluded.kickoff,
                    finished=excluded.finished",
            )?;
            for m in matches {
                stmt.execute(params![
                    m.id,
                    m.home_team_id,
                    m.away_team_id,
                    m.matchday,
                    m.home_halftime_score,
                    m.away_halftime_score,
                    m.home_fulltime_score,
                    m.away_fulltime_score,
                    m.kickoff,
                    m.finished,
                ])
                .with_context(|| format!("Failed to upsert match {}", m.id))?;
            }
        }
        tx.commit()?;
        Ok(matches.len())
    }

    #[allow(dead_code)] // read-back for tests and manual inspection
    pub fn list_matches(&self) -> Result<Vec<Match>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, matchday, home_id, away_id,
                    home_ht_score, away_ht_score, home_ft_score, away_ft_score,
                    kickoff, finished
             FROM matches ORDER BY id",
        )?;
        let matches = stmt
            .query_map([], map_match)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(matches)
    }

    // ── Players + goals ──────────────────────────────────────────────────────

    /// Upsert players and goals together in one transaction. Players go
    /// first so every goal's scorer exists when the goal is written.
    pub fn upsert_players_and_goals(&self, players: &[Player], goals: &[Goal]) -> Result<()> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        {
            let mut player_stmt = tx.prepare(
                "INSERT INTO players (id, team_id, name)
                 VALUES (?1,?2,?3)
                 ON CONFLICT(id) DO UPDATE SET
                    team_id=excluded.team_id,
                    name=excluded.name",
            )?;
            for p in players {
                player_stmt
                    .execute(params![p.id, p.team_id, p.name])
                    .with_context(|| format!("Failed to upsert player {}", p.id))?;
            }

            let mut goal_stmt = tx.prepare(
                "INSERT INTO goals (id, match_id, player_id, minute,
                                    home_score, away_score, penalty, owngoal)
                 VALUES (?1,?2,?3,?4,?5,?6,?7,?8)
                 ON CONFLICT(id) DO UPDATE SET
                    match_id=excluded.match_id,
                    player_id=excluded.player_id,
                    minute=excluded.minute,
                    home_score=excluded.home_score,
                    away_score=excluded.away_score,
                    penalty=excluded.penalty,
                    owngoal=excluded.owngoal",
            )?;
            for g in goals {
                goal_stmt
                    .execute(params![
                        g.id,
                        g.match_id,
                        g.player_id,
                        g.minute,
                        g.home_score,
                        g.away_score,
                        g.penalty,
                        g.own_goal,
                    ])
                    .with_context(|| format!("Failed to upsert goal {}", g.id))?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    #[allow(dead_code)] // read-back for tests and manual inspection
    pub fn list_players(&self) -> Result<Vec<Player>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT id, team_id, name FROM players ORDER BY id")?;
        let players = stmt
            .query_map([], |row| {
                Ok(Player {
                    id: row.get(0)?,
                    team_id: row.get(1)?,
                    name: row.get(2)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(players)
    }

    #[allow(dead_code)] // read-back for tests and manual inspection
    pub fn list_goals(&self) -> Result<Vec<Goal>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, match_id, player_id, minute, home_score, away_score, penalty, owngoal
             FROM goals ORDER BY id",
        )?;
        let goals = stmt
            .query_map([], map_goal)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(goals)
    }

    // ── Season progress ──────────────────────────────────────────────────────

    /// Highest stored matchday, 0 when no matches are stored
    pub fn max_matchday(&self) -> Result<u32> {
        let conn = self.lock()?;
        let max: u32 = conn.query_row(
            "SELECT COALESCE(MAX(matchday), 0) FROM matches",
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    /// Lowest matchday with an unfinished match, or the last matchday once
    /// the season is over
    pub fn current_matchday(&self) -> Result<u32> {
        let open: Option<u32> = {
            let conn = self.lock()?;
            conn.query_row(
                "SELECT MIN(matchday) FROM matches WHERE finished = 0",
                [],
                |row| row.get(0),
            )?
        };
        match open {
            Some(matchday) => Ok(matchday),
            None => self.max_matchday(),
        }
    }

    // ── Scorers ──────────────────────────────────────────────────────────────

    /// Goal, penalty and own-goal counts per player, most goals first
    pub fn scorer_stats(&self) -> Result<Vec<ScorerStats>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT p.id, p.team_id, p.name,
                    COUNT(g.id),
                    COALESCE(SUM(g.penalty), 0),
                    COALESCE(SUM(g.owngoal), 0)
             FROM players p
             JOIN goals g ON g.player_id = p.id
             GROUP BY p.id, p.team_id, p.name
             ORDER BY COUNT(g.id) DESC, p.id ASC",
        )?;
        let stats = stmt
            .query_map([], |row| {
                Ok(ScorerStats {
                    player_id: row.get(0)?,
                    team_id: row.get(1)?,
                    name: row.get(2)?,
                    goals: row.get(3)?,
                    penalties: row.get(4)?,
                    own_goals: row.get(5)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stats)
    }
}

// ── SQL helpers ────────────────────────────────────────────────────────────────

fn map_team(row: &rusqlite::Row) -> rusqlite::Result<Team> {
    Ok(Team {
        id: row.get(0)?,
        name: row.get(1)?,
        short_name: row.get(2)?,
        abbreviation: row.get(3)?,
        icon_url: row.get(4)?,
    })
}

fn map_match(row: &rusqlite::Row) -> rusqlite::Result<Match> {
    Ok(Match {
        id: row.get(0)?,
        matchday: row.get(1)?,
        home_team_id: row.get(2)?,
        away_team_id: row.get(3)?,
        home_halftime_score: row.get(4)?,
        away_halftime_score: row.get(5)?,
        home_fulltime_score: row.get(6)?,
        away_fulltime_score: row.get(7)?,
        kickoff: row.get(8)?,
        finished: row.get(9)?,
    })
}

fn map_goal(row: &rusqlite::Row) -> rusqlite::Result<Goal> {
    Ok(Goal {
        id: row.get(0)?,
        match_id: row.get(1)?,
        player_id: row.get(2)?,
        minute: row.get(3)?,
        home_score: row.get(4)?,
        away_score: row.get(5)?,
        penalty: row.get(6)?,
        own_goal: row.get(7)?,
    })
}

/// SQLite schema (idempotent CREATE IF NOT EXISTS), in dependency order
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS teams (
    id           INTEGER PRIMARY KEY,
    name         TEXT    NOT NULL,
    shortname    TEXT    NOT NULL,
    abbreviation TEXT    NOT NULL,
    icon         TEXT
);

CREATE TABLE IF NOT EXISTS matches (
    id            INTEGER PRIMARY KEY,
    home_id       INTEGER NOT NULL,
    away_id       INTEGER NOT NULL,
    matchday      INTEGER NOT NULL,
    home_ht_score INTEGER,
    away_ht_score INTEGER,
    home_ft_score INTEGER,
    away_ft_score INTEGER,
    kickoff       TEXT    NOT NULL,
    finished      INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (home_id) REFERENCES teams(id),
    FOREIGN KEY (away_id) REFERENCES teams(id)
);

CREATE TABLE IF NOT EXISTS players (
    id      INTEGER PRIMARY KEY,
    team_id INTEGER NOT NULL,
    name    TEXT    NOT NULL,
    FOREIGN KEY (team_id) REFERENCES teams(id)
);

CREATE TABLE IF NOT EXISTS goals (
    id         INTEGER PRIMARY KEY,
    match_id   INTEGER NOT NULL,
    player_id  INTEGER NOT NULL,
    minute     INTEGER NOT NULL,
    home_score INTEGER NOT NULL,
    away_score INTEGER NOT NULL,
    penalty    INTEGER NOT NULL DEFAULT 0,
    owngoal    INTEGER NOT NULL DEFAULT 0,
    FOREIGN KEY (match_id)  REFERENCES matches(id),
    FOREIGN KEY (player_id) REFERENCES players(id)
);

CREATE INDEX IF NOT EXISTS idx_matches_matchday ON matches(matchday);
CREATE INDEX IF NOT EXISTS idx_goals_match ON goals(match_id);
CREATE INDEX IF NOT EXISTS idx_goals_player ON goals(player_id);
"#;
