use std::collections::HashSet;

use crate::db::models::Team;
use crate::openligadb::{RawMatch, RawTeam};

/// Curated display names for clubs whose upstream names are too long or
/// inconsistent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamNames {
    pub name: &'static str,
    pub short_name: &'static str,
    pub abbreviation: &'static str,
}

const fn names(
    name: &'static str,
    short_name: &'static str,
    abbreviation: &'static str,
) -> TeamNames {
    TeamNames {
        name,
        short_name,
        abbreviation,
    }
}

/// Upstream display name → curated names (1. Bundesliga clubs)
const NAME_OVERRIDES: &[(&str, TeamNames)] = &[
    ("Bayern München", names("FC Bayern München", "FC Bayern", "FCB")),
    ("Bayer 04 Leverkusen", names("Bayer 04 Leverkusen", "Leverkusen", "B04")),
    ("TSG 1899 Hoffenheim", names("TSG 1899 Hoffenheim", "Hoffenheim", "TSG")),
    ("Werder Bremen", names("SV Werder Bremen", "Bremen", "SVW")),
    ("Hertha BSC", names("Hertha BSC Berlin", "Hertha", "BSC")),
    ("VfB Stuttgart", names("VfB Stuttgart", "Stuttgart", "VFB")),
    ("Hamburger SV", names("Hamburger SV", "Hamburg", "HSV")),
    ("FC Augsburg", names("FC Augsburg", "Augsburg", "FCA")),
    ("1. FSV Mainz 05", names("1. FSV Mainz 05", "Mainz", "M05")),
    ("Hannover 96", names("Hannover 96", "Hannover", "H96")),
    ("VfL Wolfsburg", names("VfL Wolfsburg", "Wolfsburg", "WOB")),
    ("Borussia Dortmund", names("Borussia Dortmund", "Dortmund", "BVB")),
    ("FC Schalke 04", names("FC Schalke 04", "Schalke", "S04")),
    ("RB Leipzig", names("RB Leipzig", "Leipzig", "RBL")),
    ("SC Freiburg", names("SC Freiburg", "Freiburg", "SCF")),
    ("Eintracht Frankfurt", names("Eintracht Frankfurt", "Frankfurt", "SGE")),
    ("Borussia Mönchengladbach", names("Borussia Mönchengladbach", "Gladbach", "BMG")),
    ("1. FC Köln", names("1. FC Köln", "Köln", "KOE")),
];

pub fn name_override(display_name: &str) -> Option<&'static TeamNames> {
    NAME_OVERRIDES
        .iter()
        .find(|(upstream, _)| *upstream == display_name)
        .map(|(_, curated)| curated)
}

/// Build a team row, preferring curated names over derived ones.
pub fn normalize_team(raw: &RawTeam) -> Team {
    let (name, short_name, abbreviation) = match name_override(&raw.name) {
        Some(n) => (
            n.name.to_string(),
            n.short_name.to_string(),
            n.abbreviation.to_string(),
        ),
        None => {
            let short_name = if raw.short_name.is_empty() {
                raw.name.clone()
            } else {
                raw.short_name.clone()
            };
            let abbreviation = raw.name.chars().take(3).collect::<String>().to_uppercase();
            (raw.name.clone(), short_name, abbreviation)
        }
    };

    Team {
        id: raw.team_id,
        name,
        short_name,
        abbreviation,
        icon_url: raw.icon_url.clone(),
    }
}

/// New team rows for every club playing on the first matchday that is not
/// stored yet. Each id is emitted at most once.
pub fn reconcile_teams(matchdays: &[Vec<RawMatch>], known_ids: &HashSet<i64>) -> Vec<Team> {
    let Some(first) = matchdays.first() else {
        return Vec::new();
    };

    let mut seen: HashSet<i64> = known_ids.clone();
    first
        .iter()
        .flat_map(|m| [&m.team1, &m.team2])
        .filter(|raw| seen.insert(raw.team_id))
        .map(normalize_team)
        .collect()
}
