pub mod client;
pub mod feed;
pub mod models;

pub use client::OpenLigaDb;
pub use feed::MatchFeed;
pub use models::{RawGoal, RawMatch, RawTeam};
