use clap::Parser;
use url::Url;

/// Upper bound for `--matchdays`; one bucket is allocated per matchday
pub const MAX_MATCHDAYS: u32 = 100;

/// OpenLigaDB → SQLite matchday sync job
#[derive(Parser, Debug, Clone)]
#[command(name = "matchday-sync", version, about)]
pub struct Config {
    /// SQLite database path
    #[arg(long, env = "DATABASE_PATH", default_value = "matchday.db")]
    pub database_path: String,

    /// Season to sync (2017 means the 2017/18 season)
    #[arg(long, env = "SEASON", default_value = "2017")]
    pub season: String,

    /// League shortcut as used by OpenLigaDB (bl1 = 1. Bundesliga)
    #[arg(long, env = "LEAGUE", default_value = "bl1")]
    pub league: String,

    /// Number of matchdays the league plays per season
    #[arg(long, env = "MATCHDAYS", default_value = "34")]
    pub matchdays: u32,

    /// OpenLigaDB match data endpoint
    #[arg(
        long,
        env = "OPENLIGADB_API_URL",
        default_value = "https://www.openligadb.de/api/getmatchdata"
    )]
    pub api_url: String,

    /// HTTP request timeout in seconds
    #[arg(long, env = "HTTP_TIMEOUT_SECS", default_value = "10")]
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.season.trim().is_empty() {
            anyhow::bail!("season must not be empty");
        }
        if self.league.trim().is_empty() {
            anyhow::bail!("league must not be empty");
        }
        if !(1..=MAX_MATCHDAYS).contains(&self.matchdays) {
            anyhow::bail!("matchdays must be between 1 and {}", MAX_MATCHDAYS);
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("http_timeout_secs must be positive");
        }
        if let Err(e) = Url::parse(&self.api_url) {
            anyhow::bail!("api_url '{}' is not a valid URL: {}", self.api_url, e);
        }
        Ok(())
    }
}
