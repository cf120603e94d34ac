use std::collections::HashMap;

use crate::grades::{GradeStore, PlayerGrade, TeamGrades};
use crate::injury_store::{InjuryEntry, InjuryStore};
use crate::play_store::{PlayRow, PlayStore};
use crate::types::TeamId;

/// The four stores the scoring core reads, treated as one atomic read-only
/// value. Built once per batch and swapped wholesale; nothing in the
/// prediction path mutates it.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub plays: PlayStore,
    pub grades: GradeStore,
    pub injuries: InjuryStore,
}

impl Snapshot {
    pub fn new(plays: PlayStore, grades: GradeStore, injuries: InjuryStore) -> Self {
        Self {
            plays,
            grades,
            injuries,
        }
    }

    /// Assemble a snapshot from the raw collections a loader produces.
    pub fn from_parts(
        plays: Vec<PlayRow>,
        team_grades: HashMap<TeamId, TeamGrades>,
        player_grades: HashMap<TeamId, Vec<PlayerGrade>>,
        injuries: HashMap<TeamId, Vec<InjuryEntry>>,
    ) -> Self {
        Self {
            plays: PlayStore::from_rows(plays),
            grades: GradeStore::new(team_grades, player_grades),
            injuries: InjuryStore::from_map(injuries),
        }
    }
}
