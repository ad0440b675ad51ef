use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use super::models::RawMatch;

/// Source of raw match data for one league season.
#[async_trait]
pub trait MatchFeed: Send + Sync {
    /// Return every match of the season as a flat list.
    async fn fetch_matches(&self, season: &str, league: &str) -> Result<Vec<RawMatch>>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Fetch the season and bucket it into `matchday_count` matchdays.
    async fn fetch_matchdays(
        &self,
        season: &str,
        league: &str,
        matchday_count: u32,
    ) -> Result<Vec<Vec<RawMatch>>> {
        let matches = self.fetch_matches(season, league).await?;
        Ok(partition_matchdays(matches, matchday_count))
    }
}

/// Split a flat match list into per-matchday buckets.
///
/// Bucket `i` holds the matches whose `GroupOrderID` is `i + 1`. Matches with
/// an ordinal outside `1..=matchday_count` are dropped. Input order is kept
/// within each bucket.
pub fn partition_matchdays(matches: Vec<RawMatch>, matchday_count: u32) -> Vec<Vec<RawMatch>> {
    let count = matchday_count as usize;
    let mut matchdays: Vec<Vec<RawMatch>> = (0..count).map(|_| Vec::new()).collect();
    let mut dropped = 0usize;

    for m in matches {
        let ordinal = m.group.order_id;
        if ordinal >= 1 && ordinal <= count as i64 {
            matchdays[(ordinal - 1) as usize].push(m);
        } else {
            dropped += 1;
        }
    }

    if dropped > 0 {
        debug!(
            "Dropped {} match(es) outside matchdays 1..={}",
            dropped, matchday_count
        );
    }
    matchdays
}
