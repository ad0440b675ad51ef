use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::feed::MatchFeed;
use super::models::RawMatch;

/// Match feed backed by the public OpenLigaDB JSON API.
/// Docs: <https://www.openligadb.de>
#[derive(Clone)]
pub struct OpenLigaDb {
    http: Client,
    base_url: Url,
}

impl OpenLigaDb {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid OpenLigaDB base URL: {}", base_url))?;
        Ok(OpenLigaDb { http, base_url })
    }

    /// `<base>/<league>/<season>`
    fn season_url(&self, season: &str, league: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("OpenLigaDB base URL cannot take a path: {}", self.base_url))?
            .pop_if_empty()
            .push(league)
            .push(season);
        Ok(url)
    }
}

#[async_trait]
impl MatchFeed for OpenLigaDb {
    fn name(&self) -> &str {
        "OpenLigaDB"
    }

    async fn fetch_matches(&self, season: &str, league: &str) -> Result<Vec<RawMatch>> {
        let url = self.season_url(season, league)?;
        debug!("Fetching match data from {}", url);

        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .context("OpenLigaDB request failed")?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("OpenLigaDB error {}: {}", status, body);
        }

        let matches: Vec<RawMatch> = resp
            .json()
            .await
            .with_context(|| format!("Failed to parse OpenLigaDB response from {}", url))?;

        info!(
            "Fetched {} match(es) for {} {}",
            matches.len(),
            league,
            season
        );
        Ok(matches)
    }
}
