//! Seedable synthetic snapshots for tests, benches and offline runs of the
//! backtest binary. The generator is deterministic: one seed, one snapshot.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grades::{PlayerGrade, TeamGrades};
use crate::injury_store::InjuryEntry;
use crate::play_store::PlayRow;
use crate::snapshot::Snapshot;
use crate::teams;
use crate::types::{InjuryStatus, PlayKind, Position, TeamId};

#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    /// How many of the 32 franchises to include.
    pub teams: usize,
    pub seasons: Vec<u16>,
    /// Offensive plays per team per season.
    pub plays_per_team: usize,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            teams: 8,
            seasons: vec![2023, 2024, 2025],
            plays_per_team: 150,
            seed: 17,
        }
    }
}

pub fn snapshot(cfg: &SyntheticConfig) -> Snapshot {
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let teams: Vec<TeamId> = teams::all().take(cfg.teams.clamp(2, 32)).collect();

    // Latent quality in 0..1 drives every generated number so good teams
    // look good across all four components.
    let strengths: Vec<f64> = teams.iter().map(|_| rng.gen_range(0.0..1.0)).collect();

    let mut plays = Vec::new();
    for (idx, team) in teams.iter().enumerate() {
        let strength = strengths[idx];
        for &season in &cfg.seasons {
            for play_no in 0..cfg.plays_per_team {
                let opponent = teams[(idx + 1 + play_no % (teams.len() - 1)) % teams.len()];
                plays.push(generate_play(&mut rng, *team, opponent, season, strength));
            }
        }
    }

    let mut team_grades = HashMap::new();
    let mut player_grades = HashMap::new();
    let mut injuries = Vec::new();
    for (idx, team) in teams.iter().enumerate() {
        let strength = strengths[idx];
        team_grades.insert(*team, generate_team_grades(&mut rng, strength));
        player_grades.insert(*team, generate_player_grades(&mut rng, strength));

        if rng.gen_bool(0.4) {
            let status = if rng.gen_bool(0.5) {
                InjuryStatus::Out
            } else {
                InjuryStatus::Questionable
            };
            let position = [Position::Wr, Position::Lb, Position::Og][rng.gen_range(0..3)];
            let mut entry = InjuryEntry::new(
                *team,
                format!("{} {}", team.as_str(), position.code()),
                position,
                status,
            );
            entry.note = "synthetic".into();
            injuries.push(entry);
        }
    }

    Snapshot::from_parts(plays, team_grades, player_grades, group_by_team(injuries))
}

fn group_by_team(entries: Vec<InjuryEntry>) -> HashMap<TeamId, Vec<InjuryEntry>> {
    let mut out: HashMap<TeamId, Vec<InjuryEntry>> = HashMap::new();
    for entry in entries {
        out.entry(entry.team).or_default().push(entry);
    }
    out
}

fn generate_play(
    rng: &mut StdRng,
    team: TeamId,
    opponent: TeamId,
    season: u16,
    strength: f64,
) -> PlayRow {
    let week = rng.gen_range(1..=18);
    let is_pass = rng.gen_bool(0.58);
    let edge = (strength - 0.5) * 0.30;
    let epa = edge + rng.gen_range(-1.2..1.2);
    let yards_gained = (4.0 + edge * 10.0 + rng.gen_range(-4.0..9.0)).round() as i16;
    let turnover = rng.gen_bool((0.035 - strength * 0.02).max(0.005));

    PlayRow {
        game_id: format!("{season}_{week:02}_{}_{}", team.as_str(), opponent.as_str()),
        season,
        week,
        pos_team: team,
        def_team: opponent,
        play_kind: if is_pass { PlayKind::Pass } else { PlayKind::Run },
        down: Some(rng.gen_range(1..=4)),
        yards_to_go: Some(rng.gen_range(1..=10)),
        yardline_100: rng.gen_range(1..=99),
        yards_gained,
        epa: Some(epa),
        success: epa > 0.0,
        interception: turnover && is_pass,
        fumble_lost: turnover && !is_pass,
        air_yards: is_pass.then(|| rng.gen_range(-2.0..25.0)),
        yards_after_catch: is_pass.then(|| rng.gen_range(0.0..12.0)),
        qb_epa: is_pass.then_some(epa),
        quarter_seconds_remaining: Some(rng.gen_range(0..900)),
        game_seconds_remaining: Some(rng.gen_range(0..3600)),
    }
}

fn generate_team_grades(rng: &mut StdRng, strength: f64) -> TeamGrades {
    let mut grade = |spread: f64| {
        (50.0 + (strength - 0.5) * 40.0 + rng.gen_range(-spread..spread)).clamp(20.0, 99.0)
    };
    TeamGrades {
        passing: grade(8.0),
        rushing: grade(8.0),
        receiving: grade(8.0),
        pass_blocking: grade(8.0),
        run_blocking: grade(8.0),
        pass_rush: grade(8.0),
        run_defense: grade(8.0),
        coverage: grade(8.0),
        tackling: grade(8.0),
        overall_offense: grade(4.0),
        overall_defense: grade(4.0),
    }
}

fn generate_player_grades(rng: &mut StdRng, strength: f64) -> Vec<PlayerGrade> {
    let mut out = Vec::new();
    let depth = [
        (Position::Qb, 2),
        (Position::Rb, 2),
        (Position::Wr, 3),
        (Position::Te, 2),
        (Position::Ot, 2),
        (Position::Cb, 2),
    ];
    for (position, count) in depth {
        for slot in 0..count {
            let base = 55.0 + (strength - 0.5) * 30.0 - slot as f64 * 12.0;
            out.push(PlayerGrade {
                player: format!("{} {}", position.code(), slot + 1),
                position,
                grade: (base + rng.gen_range(-5.0..5.0)).clamp(20.0, 99.0),
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_snapshot() {
        let cfg = SyntheticConfig::default();
        let a = snapshot(&cfg);
        let b = snapshot(&cfg);
        assert_eq!(a.plays.len(), b.plays.len());
        for team in teams::all().take(cfg.teams) {
            assert_eq!(a.plays.team_play_count(team), b.plays.team_play_count(team));
            assert_eq!(a.grades.team(team), b.grades.team(team));
        }
    }

    #[test]
    fn generates_requested_shape() {
        let cfg = SyntheticConfig {
            teams: 4,
            seasons: vec![2024, 2025],
            plays_per_team: 120,
            seed: 99,
        };
        let snap = snapshot(&cfg);
        assert_eq!(snap.plays.len(), 4 * 2 * 120);
        assert_eq!(snap.plays.season_count(), 2);
        for team in teams::all().take(4) {
            assert!(snap.grades.contains_team(team));
            assert!(snap.grades.has_player_grades(team));
            assert_eq!(snap.plays.team_play_count(team), 240);
        }
    }

    #[test]
    fn success_flag_tracks_epa_sign() {
        let snap = snapshot(&SyntheticConfig::default());
        for play in snap.plays.plays_where(None, None, None) {
            if let Some(epa) = play.epa {
                assert_eq!(play.success, epa > 0.0);
            }
        }
    }
}
