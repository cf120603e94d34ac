use crate::grades::TeamGrades;

/// Head-to-head score delta from opposing unit grades, in grade units.
/// Positive favours the offense. Typical range is about ±30; ungraded
/// teams (all fields neutral) produce exactly zero.
pub fn matchup_delta(offense: &TeamGrades, defense: &TeamGrades) -> f64 {
    0.30 * (offense.overall_offense - defense.overall_defense)
        + 0.25 * (offense.passing - defense.coverage)
        + 0.20 * (offense.rushing - defense.run_defense)
        + 0.15 * (offense.receiving - defense.coverage)
        + 0.10 * (offense.pass_blocking - defense.pass_rush)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_grades_cancel_out() {
        let delta = matchup_delta(&TeamGrades::default(), &TeamGrades::default());
        assert!(delta.abs() < 1e-12);
    }

    #[test]
    fn coefficients_apply_per_unit() {
        let offense = TeamGrades {
            overall_offense: 80.0,
            passing: 70.0,
            rushing: 60.0,
            receiving: 50.0,
            pass_blocking: 40.0,
            ..TeamGrades::default()
        };
        let defense = TeamGrades {
            overall_defense: 60.0,
            coverage: 50.0,
            run_defense: 50.0,
            pass_rush: 50.0,
            ..TeamGrades::default()
        };
        let expected = 0.30 * 20.0 + 0.25 * 20.0 + 0.20 * 10.0 + 0.15 * 0.0 + 0.10 * (-10.0);
        assert!((matchup_delta(&offense, &defense) - expected).abs() < 1e-12);
    }

    #[test]
    fn mismatch_is_antisymmetric_for_mirrored_teams() {
        let strong = TeamGrades {
            overall_offense: 90.0,
            overall_defense: 90.0,
            passing: 90.0,
            rushing: 90.0,
            receiving: 90.0,
            pass_blocking: 90.0,
            run_blocking: 90.0,
            pass_rush: 90.0,
            run_defense: 90.0,
            coverage: 90.0,
            tackling: 90.0,
        };
        let weak = TeamGrades::default();
        let forward = matchup_delta(&strong, &weak);
        let backward = matchup_delta(&weak, &strong);
        assert!((forward + backward).abs() < 1e-12);
        assert!(forward > 0.0);
    }
}
