use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{InjuryStatus, Position, TeamId};

/// One line of a team's injury report, with depth-chart context resolved by
/// the loader. The date arithmetic behind `long_term` and `preseason` is the
/// loader's job; the scoring core only consumes the booleans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryEntry {
    pub team: TeamId,
    pub player: String,
    /// `None` when the report carried a position string the closed set does
    /// not recognise.
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: Option<Position>,
    /// `None` when the report status is unrecognised; such entries are
    /// skipped with a warning.
    #[serde(default, deserialize_with = "lenient_status")]
    pub status: Option<InjuryStatus>,
    #[serde(default)]
    pub note: String,
    /// Injury predates this game week by two months or more.
    #[serde(default)]
    pub long_term: bool,
    /// Injury predates the season start; the roster already absorbed it.
    #[serde(default)]
    pub preseason: bool,
    /// The next man up is an ungraded rookie making a first start.
    #[serde(default)]
    pub backup_rookie: bool,
}

impl InjuryEntry {
    pub fn new(team: TeamId, player: impl Into<String>, position: Position, status: InjuryStatus) -> Self {
        Self {
            team,
            player: player.into(),
            position: Some(position),
            status: Some(status),
            note: String::new(),
            long_term: false,
            preseason: false,
            backup_rookie: false,
        }
    }

    /// Boundary constructor: parses report strings leniently, keeping
    /// unrecognised values as `None` rather than failing the load.
    pub fn from_report_row(
        team: TeamId,
        player: impl Into<String>,
        position: &str,
        status: &str,
        note: impl Into<String>,
    ) -> Self {
        Self {
            team,
            player: player.into(),
            position: Position::from_code(position),
            status: InjuryStatus::from_code(status),
            note: note.into(),
            long_term: false,
            preseason: false,
            backup_rookie: false,
        }
    }
}

fn lenient_position<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Position>, D::Error> {
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(Position::from_code))
}

fn lenient_status<'de, D: Deserializer<'de>>(de: D) -> Result<Option<InjuryStatus>, D::Error> {
    let raw = Option::<String>::deserialize(de)?;
    Ok(raw.as_deref().and_then(InjuryStatus::from_code))
}

/// Current injuries keyed by team. Read-only after load.
#[derive(Debug, Default, Clone)]
pub struct InjuryStore {
    by_team: HashMap<TeamId, Vec<InjuryEntry>>,
}

impl InjuryStore {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = InjuryEntry>,
    {
        let mut by_team: HashMap<TeamId, Vec<InjuryEntry>> = HashMap::new();
        for entry in entries {
            by_team.entry(entry.team).or_default().push(entry);
        }
        Self { by_team }
    }

    pub fn from_map(by_team: HashMap<TeamId, Vec<InjuryEntry>>) -> Self {
        Self { by_team }
    }

    /// A team with no report lines gets an empty slice, never an error.
    pub fn report_for(&self, team: TeamId) -> &[InjuryEntry] {
        self.by_team.get(&team).map_or(&[], Vec::as_slice)
    }

    pub fn team_count(&self) -> usize {
        self.by_team.len()
    }

    pub fn entry_count(&self) -> usize {
        self.by_team.values().map(Vec::len).sum()
    }
}
