use serde::Serialize;

use crate::component::{ensure_finite, ComponentScore, NEUTRAL_SCORE};
use crate::epa_score::EpaScore;
use crate::error::Result;
use crate::success_score::SuccessScore;
use crate::turnover_score::TurnoverScore;
use crate::yards_score::YardsScore;

// Component weights. They intentionally sum to 1.03: the matchup and
// weather terms ride on top of the four efficiency components rather than
// diluting them. Do not renormalise.
pub const W_EPA: f64 = 0.26;
pub const W_SUCCESS: f64 = 0.26;
pub const W_YARDS: f64 = 0.21;
pub const W_TURNOVER: f64 = 0.21;
pub const W_MATCHUP: f64 = 0.08;
pub const W_WEATHER: f64 = 0.01;

/// Everything one side of a matchup contributed to its final score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TeamComponents {
    pub epa: ComponentScore,
    pub success: ComponentScore,
    pub yards: ComponentScore,
    pub turnover: ComponentScore,
    /// Signed grade delta against this opponent, in grade units.
    pub matchup_delta: f64,
    /// Weather contribution on the 0..100 scale (shared by both sides).
    pub weather: f64,
    /// Aggregated score before home field and injuries.
    pub raw: f64,
    /// Win-probability deduction applied to the raw score, in `[0, 0.40]`.
    pub injury_deduction: f64,
}

impl TeamComponents {
    pub fn insufficient_data(&self) -> bool {
        self.epa.insufficient_data
            || self.success.insufficient_data
            || self.yards.insufficient_data
            || self.turnover.insufficient_data
    }
}

/// Weighted sum of the component scores for one team. The matchup delta is
/// centred on 50 so a neutral matchup contributes the same as a neutral
/// component.
pub fn aggregate(
    epa: &EpaScore,
    success: &SuccessScore,
    yards: &YardsScore,
    turnover: &TurnoverScore,
    matchup_delta: f64,
    weather: f64,
    injury_deduction: f64,
) -> Result<TeamComponents> {
    let raw = W_EPA * epa.component.score
        + W_SUCCESS * success.component.score
        + W_YARDS * yards.component.score
        + W_TURNOVER * turnover.component.score
        + W_MATCHUP * (NEUTRAL_SCORE + matchup_delta)
        + W_WEATHER * weather;
    let raw = ensure_finite(raw, "aggregated team score")?;

    Ok(TeamComponents {
        epa: epa.component,
        success: success.component,
        yards: yards.component,
        turnover: turnover.component,
        matchup_delta,
        weather,
        raw,
        injury_deduction,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::epa_score::EpaBreakdowns;
    use crate::success_score::SuccessBreakdowns;
    use crate::turnover_score::TurnoverBreakdowns;
    use crate::yards_score::YardsBreakdowns;

    fn flat(score: f64) -> ComponentScore {
        ComponentScore {
            score,
            blended: 0.0,
            insufficient_data: false,
        }
    }

    fn parts(score: f64) -> (EpaScore, SuccessScore, YardsScore, TurnoverScore) {
        (
            EpaScore {
                component: flat(score),
                grade_adjustment: 0.0,
                breakdowns: EpaBreakdowns::default(),
            },
            SuccessScore {
                component: flat(score),
                breakdowns: SuccessBreakdowns::default(),
            },
            YardsScore {
                component: flat(score),
                breakdowns: YardsBreakdowns::default(),
            },
            TurnoverScore {
                component: flat(score),
                breakdowns: TurnoverBreakdowns::default(),
            },
        )
    }

    #[test]
    fn neutral_everything_lands_at_the_design_midpoint() {
        let (epa, success, yards, turnover) = parts(50.0);
        let components = aggregate(&epa, &success, &yards, &turnover, 0.0, 50.0, 0.0).unwrap();
        // 0.94 * 50 + 0.08 * 50 + 0.01 * 50 = 51.5; the 1.03 weight sum is
        // deliberate.
        assert!((components.raw - 51.5).abs() < 1e-9);
        assert!(!components.insufficient_data());
    }

    #[test]
    fn matchup_delta_moves_the_raw_score() {
        let (epa, success, yards, turnover) = parts(50.0);
        let up = aggregate(&epa, &success, &yards, &turnover, 10.0, 50.0, 0.0).unwrap();
        let down = aggregate(&epa, &success, &yards, &turnover, -10.0, 50.0, 0.0).unwrap();
        assert!((up.raw - down.raw - 1.6).abs() < 1e-9);
    }

    #[test]
    fn perfect_team_exceeds_one_hundred_raw() {
        let (epa, success, yards, turnover) = parts(100.0);
        let components = aggregate(&epa, &success, &yards, &turnover, 30.0, 50.0, 0.0).unwrap();
        assert!(components.raw > 100.0);
    }
}
