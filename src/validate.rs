use crate::error::{EngineError, Result};
use crate::progressive::season_weights;
use crate::snapshot::Snapshot;
use crate::types::TeamId;

/// A team with fewer offensive plays than this (but more than zero) is a
/// partially loaded snapshot. Zero plays is a different case: the team
/// degrades to neutral component scores instead of being rejected.
pub const MIN_TEAM_PLAYS: usize = 100;

/// Preflight checks run before any scoring work. Rejection here is
/// recoverable: install a complete snapshot or change the request.
pub fn preflight(
    snapshot: &Snapshot,
    home: TeamId,
    away: TeamId,
    week: u8,
    season: u16,
) -> Result<()> {
    let weights = season_weights(week, season)?;
    if (weights.sum() - 1.0).abs() > 1e-9 {
        return Err(EngineError::NotReady(format!(
            "progressive weights for week {week} sum to {}",
            weights.sum()
        )));
    }

    if snapshot.plays.season_count() == 0 {
        return Err(EngineError::NotReady("no seasons loaded".into()));
    }

    for team in [home, away] {
        if !snapshot.grades.contains_team(team) {
            return Err(EngineError::UnknownTeam(team));
        }
        let plays = snapshot.plays.team_play_count(team);
        if plays > 0 && plays < MIN_TEAM_PLAYS {
            return Err(EngineError::NotReady(format!(
                "{team} has only {plays} plays loaded (need {MIN_TEAM_PLAYS})"
            )));
        }
        // The report may be empty; it only has to resolve.
        let _ = snapshot.injuries.report_for(team);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::{GradeStore, TeamGrades};
    use crate::play_store::{PlayRow, PlayStore};
    use crate::types::PlayKind;

    fn play(team: &str, def: &str) -> PlayRow {
        PlayRow {
            game_id: "g".into(),
            season: 2025,
            week: 1,
            pos_team: TeamId::parse(team).unwrap(),
            def_team: TeamId::parse(def).unwrap(),
            play_kind: PlayKind::Pass,
            down: Some(1),
            yards_to_go: Some(10),
            yardline_100: 50,
            yards_gained: 5,
            epa: Some(0.1),
            success: true,
            interception: false,
            fumble_lost: false,
            air_yards: None,
            yards_after_catch: None,
            qb_epa: None,
            quarter_seconds_remaining: None,
            game_seconds_remaining: None,
        }
    }

    fn snapshot(plays_per_side: usize) -> Snapshot {
        let mut rows = Vec::new();
        for _ in 0..plays_per_side {
            rows.push(play("BUF", "MIA"));
            rows.push(play("MIA", "BUF"));
        }
        let mut grades = GradeStore::default();
        grades.insert_team(TeamId::parse("BUF").unwrap(), TeamGrades::default());
        grades.insert_team(TeamId::parse("MIA").unwrap(), TeamGrades::default());
        Snapshot::new(PlayStore::from_rows(rows), grades, Default::default())
    }

    #[test]
    fn complete_snapshot_passes() {
        let snap = snapshot(120);
        let buf = TeamId::parse("BUF").unwrap();
        let mia = TeamId::parse("MIA").unwrap();
        assert!(preflight(&snap, buf, mia, 3, 2025).is_ok());
    }

    #[test]
    fn partial_play_set_is_not_ready() {
        let snap = snapshot(40);
        let buf = TeamId::parse("BUF").unwrap();
        let mia = TeamId::parse("MIA").unwrap();
        let err = preflight(&snap, buf, mia, 3, 2025).unwrap_err();
        assert!(matches!(err, EngineError::NotReady(_)));
    }

    #[test]
    fn zero_play_team_is_allowed_through() {
        let mut snap = snapshot(120);
        let ghost = TeamId::parse("XXX").unwrap();
        snap.grades.insert_team(ghost, TeamGrades::default());
        let mia = TeamId::parse("MIA").unwrap();
        assert!(preflight(&snap, ghost, mia, 3, 2025).is_ok());
    }

    #[test]
    fn ungraded_team_is_unknown() {
        let snap = snapshot(120);
        let buf = TeamId::parse("BUF").unwrap();
        let sea = TeamId::parse("SEA").unwrap();
        assert_eq!(
            preflight(&snap, buf, sea, 3, 2025).unwrap_err(),
            EngineError::UnknownTeam(sea)
        );
    }

    #[test]
    fn empty_store_and_bad_week_are_not_ready() {
        let empty = Snapshot::default();
        let buf = TeamId::parse("BUF").unwrap();
        let mia = TeamId::parse("MIA").unwrap();
        assert!(matches!(
            preflight(&empty, buf, mia, 3, 2025),
            Err(EngineError::NotReady(_))
        ));
        let snap = snapshot(120);
        assert!(matches!(
            preflight(&snap, buf, mia, 0, 2025),
            Err(EngineError::NotReady(_))
        ));
    }
}
