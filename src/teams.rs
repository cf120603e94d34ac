use crate::types::TeamId;

/// Franchise abbreviation / full-name pairs for the 32 current teams.
/// Callers supply abbreviations; the alias lookup accepts either form.
pub const TEAM_ALIASES: [(&str, &str); 32] = [
    ("ARI", "Arizona Cardinals"),
    ("ATL", "Atlanta Falcons"),
    ("BAL", "Baltimore Ravens"),
    ("BUF", "Buffalo Bills"),
    ("CAR", "Carolina Panthers"),
    ("CHI", "Chicago Bears"),
    ("CIN", "Cincinnati Bengals"),
    ("CLE", "Cleveland Browns"),
    ("DAL", "Dallas Cowboys"),
    ("DEN", "Denver Broncos"),
    ("DET", "Detroit Lions"),
    ("GB", "Green Bay Packers"),
    ("HOU", "Houston Texans"),
    ("IND", "Indianapolis Colts"),
    ("JAX", "Jacksonville Jaguars"),
    ("KC", "Kansas City Chiefs"),
    ("LAC", "Los Angeles Chargers"),
    ("LAR", "Los Angeles Rams"),
    ("LV", "Las Vegas Raiders"),
    ("MIA", "Miami Dolphins"),
    ("MIN", "Minnesota Vikings"),
    ("NE", "New England Patriots"),
    ("NO", "New Orleans Saints"),
    ("NYG", "New York Giants"),
    ("NYJ", "New York Jets"),
    ("PHI", "Philadelphia Eagles"),
    ("PIT", "Pittsburgh Steelers"),
    ("SEA", "Seattle Seahawks"),
    ("SF", "San Francisco 49ers"),
    ("TB", "Tampa Bay Buccaneers"),
    ("TEN", "Tennessee Titans"),
    ("WAS", "Washington Commanders"),
];

/// Full franchise name for a known abbreviation.
pub fn full_name(team: TeamId) -> Option<&'static str> {
    TEAM_ALIASES
        .iter()
        .find(|(abbr, _)| *abbr == team.as_str())
        .map(|(_, name)| *name)
}

/// Resolve either an abbreviation or a full franchise name.
pub fn resolve(name: &str) -> Option<TeamId> {
    let trimmed = name.trim();
    if let Some(id) = TeamId::parse(trimmed) {
        if full_name(id).is_some() {
            return Some(id);
        }
    }
    TEAM_ALIASES
        .iter()
        .find(|(_, full)| full.eq_ignore_ascii_case(trimmed))
        .and_then(|(abbr, _)| TeamId::parse(abbr))
}

pub fn all() -> impl Iterator<Item = TeamId> {
    TEAM_ALIASES
        .iter()
        .filter_map(|(abbr, _)| TeamId::parse(abbr))
}
