use anyhow::Result;
use chrono::Utc;
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

mod config;
mod db;
mod openligadb;
mod sync;

use config::Config;
use db::Database;
use openligadb::OpenLigaDb;
use sync::SyncEngine;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialise tracing / logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    config.validate()?;

    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);

    let feed = OpenLigaDb::new(
        &config.api_url,
        Duration::from_secs(config.http_timeout_secs),
    )?;

    let engine = SyncEngine::new(&config, Arc::new(feed), db);
    match engine.run().await {
        Ok(summary) => {
            info!(
                "Sync complete: {} new team(s), {} match(es), {} player(s), {} goal(s); current matchday {}",
                summary.teams,
                summary.matches,
                summary.players,
                summary.goals,
                summary.current_matchday
            );
            println!("Update: {}", Utc::now().to_rfc3339());
            Ok(())
        }
        Err(e) => {
            error!("Sync failed: {:#}", e);
            Err(e)
        }
    }
}
