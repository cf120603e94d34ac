use serde::Serialize;

use crate::grades::GradeStore;
use crate::injury_store::{InjuryEntry, InjuryStore};
use crate::types::{InjuryStatus, Position, PositionFamily, TeamId};

/// Ceiling on a team's total win-probability deduction. Keeps a pathological
/// report from driving the score below 60% of its unadjusted value.
pub const TEAM_IMPACT_CAP: f64 = 0.40;

/// Assumed quality of a starter whose grade is unknown.
const DEFAULT_STARTER_GRADE: f64 = 70.0;

/// A backup with no grade of their own is assumed this far below the
/// starter.
const BACKUP_GRADE_DROP: f64 = 15.0;

/// One injury's contribution to the team deduction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntryImpact {
    pub player: String,
    /// The family the entry was scored under; unknown positions land in
    /// `Special`.
    pub position: Option<Position>,
    pub status: InjuryStatus,
    pub impact: f64,
}

/// Win-probability deduction for one team, already capped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InjuryImpact {
    pub total: f64,
    pub entries: Vec<EntryImpact>,
}

/// Convert a team's injury report into a win-probability deduction in
/// `[0, 0.40]`. QUESTIONABLE players, long-term absences and preseason
/// injuries are treated as already priced into the play-by-play sample.
pub fn injury_deduction(grades: &GradeStore, injuries: &InjuryStore, team: TeamId) -> InjuryImpact {
    let mut total = 0.0;
    let mut entries = Vec::new();

    for entry in injuries.report_for(team) {
        let Some(status) = entry.status else {
            log::warn!(
                "skipping {} ({}): unrecognised injury status",
                entry.player,
                team
            );
            continue;
        };
        if status == InjuryStatus::Questionable {
            continue;
        }
        if entry.long_term || entry.preseason {
            continue;
        }

        let impact = entry_impact(grades, entry, status);
        if impact > 0.0 {
            total += impact;
            entries.push(EntryImpact {
                player: entry.player.clone(),
                position: entry.position,
                status,
                impact,
            });
        }
    }

    InjuryImpact {
        total: total.min(TEAM_IMPACT_CAP),
        entries,
    }
}

fn entry_impact(grades: &GradeStore, entry: &InjuryEntry, status: InjuryStatus) -> f64 {
    let family = match entry.position {
        Some(position) => position.family(),
        None => {
            log::warn!(
                "unknown position for {} ({}); scoring as special teams",
                entry.player,
                entry.team
            );
            PositionFamily::Special
        }
    };

    let starter = entry
        .position
        .and_then(|pos| grades.starter_grade(entry.team, pos, &entry.player))
        .unwrap_or(DEFAULT_STARTER_GRADE);
    let backup = entry
        .position
        .and_then(|pos| grades.backup_grade(entry.team, pos, &entry.player))
        .unwrap_or(starter - BACKUP_GRADE_DROP);

    let base = base_impact(family, entry.position, starter);
    let mut absorb = backup_adjustment(family, backup);
    if entry.backup_rookie {
        absorb *= 0.5;
    }

    base * absorb * status.multiplier()
}

/// Base win-probability cost of losing the starter, before the backup and
/// status multipliers.
fn base_impact(family: PositionFamily, position: Option<Position>, grade: f64) -> f64 {
    match family {
        PositionFamily::Quarterback => {
            if grade >= 85.0 {
                0.20
            } else if grade >= 75.0 {
                0.15
            } else if grade >= 65.0 {
                0.10
            } else {
                0.08
            }
        }
        PositionFamily::Skill => {
            if grade >= 85.0 {
                0.05
            } else if grade >= 75.0 {
                0.03
            } else if grade >= 65.0 {
                0.02
            } else {
                0.01
            }
        }
        PositionFamily::OffensiveLine => {
            let tackle_base = if grade >= 85.0 {
                0.020
            } else if grade >= 75.0 {
                0.015
            } else if grade >= 65.0 {
                0.010
            } else {
                0.005
            };
            match position {
                Some(Position::C) => tackle_base * 0.8,
                Some(Position::Og) => tackle_base * 0.6,
                _ => tackle_base,
            }
        }
        PositionFamily::Defense => {
            if grade >= 85.0 {
                0.020
            } else if grade >= 75.0 {
                0.010
            } else {
                0.005
            }
        }
        PositionFamily::Special => 0.005,
    }
}

/// How much of the base impact survives the backup stepping in. Smaller is
/// a better backup.
fn backup_adjustment(family: PositionFamily, backup_grade: f64) -> f64 {
    match family {
        PositionFamily::Quarterback => {
            if backup_grade >= 75.0 {
                0.3
            } else if backup_grade >= 65.0 {
                0.5
            } else {
                0.7
            }
        }
        PositionFamily::Skill => {
            if backup_grade >= 75.0 {
                0.4
            } else if backup_grade >= 65.0 {
                0.6
            } else {
                0.8
            }
        }
        PositionFamily::OffensiveLine | PositionFamily::Defense => {
            if backup_grade >= 75.0 {
                0.3
            } else if backup_grade >= 65.0 {
                0.5
            } else {
                0.7
            }
        }
        PositionFamily::Special => 0.8,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::PlayerGrade;

    fn team() -> TeamId {
        TeamId::parse("CIN").unwrap()
    }

    fn grades_with_qb(starter: f64, backup: Option<f64>) -> GradeStore {
        let mut store = GradeStore::default();
        let mut players = vec![PlayerGrade {
            player: "Star QB".into(),
            position: Position::Qb,
            grade: starter,
        }];
        if let Some(grade) = backup {
            players.push(PlayerGrade {
                player: "Backup QB".into(),
                position: Position::Qb,
                grade,
            });
        }
        store.insert_players(team(), players);
        store
    }

    fn out_entry(position: Position) -> InjuryEntry {
        InjuryEntry::new(team(), "Star QB", position, InjuryStatus::Out)
    }

    #[test]
    fn elite_qb_out_with_poor_backup() {
        let grades = grades_with_qb(90.0, Some(60.0));
        let injuries = InjuryStore::from_entries(vec![out_entry(Position::Qb)]);
        let impact = injury_deduction(&grades, &injuries, team());
        // 0.20 base, 0.7 absorb, 1.0 status.
        assert!((impact.total - 0.14).abs() < 1e-12);
        assert_eq!(impact.entries.len(), 1);
    }

    #[test]
    fn questionable_is_a_no_op() {
        let grades = grades_with_qb(90.0, Some(60.0));
        let mut entry = out_entry(Position::Qb);
        entry.status = Some(InjuryStatus::Questionable);
        let injuries = InjuryStore::from_entries(vec![entry]);
        let impact = injury_deduction(&grades, &injuries, team());
        assert_eq!(impact.total, 0.0);
        assert!(impact.entries.is_empty());
    }

    #[test]
    fn long_term_and_preseason_are_skipped() {
        let grades = grades_with_qb(90.0, Some(60.0));
        let mut long_term = out_entry(Position::Qb);
        long_term.long_term = true;
        let mut preseason = out_entry(Position::Qb);
        preseason.preseason = true;
        let injuries = InjuryStore::from_entries(vec![long_term, preseason]);
        assert_eq!(injury_deduction(&grades, &injuries, team()).total, 0.0);
    }

    #[test]
    fn cap_binds_on_pathological_reports() {
        let grades = grades_with_qb(90.0, Some(60.0));
        let injuries = InjuryStore::from_entries((0..10).map(|_| out_entry(Position::Qb)));
        let impact = injury_deduction(&grades, &injuries, team());
        assert_eq!(impact.total, TEAM_IMPACT_CAP);
        assert_eq!(impact.entries.len(), 10);
    }

    #[test]
    fn doubtful_scales_by_point_eight() {
        let grades = grades_with_qb(90.0, Some(60.0));
        let mut entry = out_entry(Position::Qb);
        entry.status = Some(InjuryStatus::Doubtful);
        let injuries = InjuryStore::from_entries(vec![entry]);
        let impact = injury_deduction(&grades, &injuries, team());
        assert!((impact.total - 0.14 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn guard_discounted_relative_to_tackle() {
        let mut store = GradeStore::default();
        store.insert_players(
            team(),
            vec![
                PlayerGrade {
                    player: "Star QB".into(),
                    position: Position::Ot,
                    grade: 88.0,
                },
                PlayerGrade {
                    player: "Star QB".into(),
                    position: Position::Og,
                    grade: 88.0,
                },
            ],
        );
        // Same grade, same (defaulted) backup: OG should cost 0.6x the OT.
        let ot = InjuryStore::from_entries(vec![out_entry(Position::Ot)]);
        let og = InjuryStore::from_entries(vec![out_entry(Position::Og)]);
        let ot_impact = injury_deduction(&store, &ot, team()).total;
        let og_impact = injury_deduction(&store, &og, team()).total;
        assert!((og_impact - ot_impact * 0.6).abs() < 1e-12);
    }

    #[test]
    fn unknown_position_scores_as_special() {
        let grades = GradeStore::default();
        let mut entry = out_entry(Position::Qb);
        entry.position = None;
        let injuries = InjuryStore::from_entries(vec![entry]);
        let impact = injury_deduction(&grades, &injuries, team());
        assert!((impact.total - 0.005 * 0.8).abs() < 1e-12);
    }

    #[test]
    fn rookie_backup_halves_the_absorption() {
        let grades = grades_with_qb(90.0, None);
        let mut entry = out_entry(Position::Qb);
        entry.backup_rookie = true;
        let injuries = InjuryStore::from_entries(vec![entry]);
        let impact = injury_deduction(&grades, &injuries, team());
        // Backup defaults to 75.0 (90 - 15) -> 0.3, halved to 0.15.
        assert!((impact.total - 0.20 * 0.15).abs() < 1e-12);
    }

    #[test]
    fn empty_report_is_zero() {
        let grades = GradeStore::default();
        let injuries = InjuryStore::default();
        assert_eq!(injury_deduction(&grades, &injuries, team()).total, 0.0);
    }
}
