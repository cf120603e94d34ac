use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Position, TeamId};

/// Neutral grade used wherever a lookup misses. Keeps degraded inputs
/// biased toward 50/50 outcomes instead of confidently wrong ones.
pub const NEUTRAL_GRADE: f64 = 50.0;

/// Per-unit quality grades for one team, all on 0..100. Fixed shape:
/// every skill is a named field, no string keys in the hot path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamGrades {
    pub passing: f64,
    pub rushing: f64,
    pub receiving: f64,
    pub pass_blocking: f64,
    pub run_blocking: f64,
    pub pass_rush: f64,
    pub run_defense: f64,
    pub coverage: f64,
    pub tackling: f64,
    pub overall_offense: f64,
    pub overall_defense: f64,
}

impl Default for TeamGrades {
    fn default() -> Self {
        Self {
            passing: NEUTRAL_GRADE,
            rushing: NEUTRAL_GRADE,
            receiving: NEUTRAL_GRADE,
            pass_blocking: NEUTRAL_GRADE,
            run_blocking: NEUTRAL_GRADE,
            pass_rush: NEUTRAL_GRADE,
            run_defense: NEUTRAL_GRADE,
            coverage: NEUTRAL_GRADE,
            tackling: NEUTRAL_GRADE,
            overall_offense: NEUTRAL_GRADE,
            overall_defense: NEUTRAL_GRADE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerGrade {
    pub player: String,
    pub position: Position,
    pub grade: f64,
}

/// Grade → quality multiplier ladder shared by the EPA adjustment.
pub fn grade_multiplier(grade: f64) -> f64 {
    if grade >= 85.0 {
        1.20
    } else if grade >= 75.0 {
        1.10
    } else if grade >= 65.0 {
        1.00
    } else if grade >= 55.0 {
        0.90
    } else {
        0.80
    }
}

/// Read-only store of team-unit and per-player grades, loaded once per
/// snapshot.
#[derive(Debug, Default, Clone)]
pub struct GradeStore {
    teams: HashMap<TeamId, TeamGrades>,
    players: HashMap<TeamId, Vec<PlayerGrade>>,
}

impl GradeStore {
    pub fn new(
        teams: HashMap<TeamId, TeamGrades>,
        players: HashMap<TeamId, Vec<PlayerGrade>>,
    ) -> Self {
        Self { teams, players }
    }

    pub fn insert_team(&mut self, team: TeamId, grades: TeamGrades) {
        self.teams.insert(team, grades);
    }

    pub fn insert_players(&mut self, team: TeamId, grades: Vec<PlayerGrade>) {
        self.players.insert(team, grades);
    }

    pub fn contains_team(&self, team: TeamId) -> bool {
        self.teams.contains_key(&team)
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }

    pub fn team(&self, team: TeamId) -> Option<&TeamGrades> {
        self.teams.get(&team)
    }

    /// Unit grades, neutral when the team is ungraded.
    pub fn team_or_neutral(&self, team: TeamId) -> TeamGrades {
        self.teams.get(&team).copied().unwrap_or_default()
    }

    pub fn players(&self, team: TeamId) -> &[PlayerGrade] {
        self.players.get(&team).map_or(&[], Vec::as_slice)
    }

    pub fn has_player_grades(&self, team: TeamId) -> bool {
        !self.players(team).is_empty()
    }

    /// Mean grade across a team's graded players at one position.
    pub fn position_average(&self, team: TeamId, position: Position) -> Option<f64> {
        let mut sum = 0.0;
        let mut n = 0usize;
        for entry in self.players(team) {
            if entry.position == position {
                sum += entry.grade;
                n += 1;
            }
        }
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    }

    /// Grade of a named player, falling back to the position average.
    pub fn starter_grade(&self, team: TeamId, position: Position, player: &str) -> Option<f64> {
        for entry in self.players(team) {
            if entry.position == position && entry.player.eq_ignore_ascii_case(player) {
                return Some(entry.grade);
            }
        }
        self.position_average(team, position)
    }

    /// Best graded player at the position other than the named starter,
    /// i.e. the depth-chart next man up.
    pub fn backup_grade(&self, team: TeamId, position: Position, starter: &str) -> Option<f64> {
        self.players(team)
            .iter()
            .filter(|entry| {
                entry.position == position && !entry.player.eq_ignore_ascii_case(starter)
            })
            .map(|entry| entry.grade)
            .fold(None, |best, grade| match best {
                Some(b) if b >= grade => Some(b),
                _ => Some(grade),
            })
    }
}
