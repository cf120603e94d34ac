use serde::Serialize;

use crate::component::{
    blend_seasons, clamp_score, ensure_finite, offense_pool, ComponentScore, NEUTRAL_SCORE,
};
use crate::error::Result;
use crate::grades::{grade_multiplier, GradeStore};
use crate::play_store::PlayStore;
use crate::progressive::BlendWeights;
use crate::types::{Position, TeamId};

/// Cap on the grade adjustment added to the blended EPA before
/// normalisation. Grades shade the score; they never dominate it.
const GRADE_ADJUSTMENT_CAP: f64 = 0.05;

/// Weight of the grade-multiplier signal relative to raw EPA.
const GRADE_ADJUSTMENT_SCALE: f64 = 0.1;

/// Mean EPA on situational subsets, diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct EpaBreakdowns {
    pub red_zone: f64,
    pub third_down: f64,
    pub two_minute: f64,
    pub goal_line: f64,
    pub normal: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpaScore {
    pub component: ComponentScore,
    /// Applied to the blend before normalisation, `±0.05` at most. Zero when
    /// grades are absent or the play set is empty.
    pub grade_adjustment: f64,
    pub breakdowns: EpaBreakdowns,
}

/// Value component: season-blended mean EPA per scrimmage play, optionally
/// shaded by player grades, normalised so one blended point of EPA spans
/// the whole scale.
pub fn score_epa(
    plays: &PlayStore,
    grades: Option<&GradeStore>,
    team: TeamId,
    weights: &BlendWeights,
) -> Result<EpaScore> {
    let blended = blend_seasons(weights, "epa blend", |season| {
        let mut sum = 0.0;
        let mut n = 0usize;
        for play in plays.offense_rows(team, season) {
            if !play.is_scrimmage() {
                continue;
            }
            if let Some(epa) = play.epa {
                sum += epa;
                n += 1;
            }
        }
        if n == 0 {
            None
        } else {
            Some(sum / n as f64)
        }
    })?;

    let breakdowns = compute_breakdowns(plays, team, weights)?;

    let Some(mut blend) = blended else {
        return Ok(EpaScore {
            component: ComponentScore::neutral(),
            grade_adjustment: 0.0,
            breakdowns,
        });
    };

    let grade_adjustment = grades
        .map(|store| grade_adjustment(store, team))
        .unwrap_or(0.0);
    blend += grade_adjustment;
    let blend = ensure_finite(blend, "epa adjusted blend")?;

    Ok(EpaScore {
        component: ComponentScore {
            score: clamp_score(NEUTRAL_SCORE + 100.0 * blend),
            blended: blend,
            insufficient_data: false,
        },
        grade_adjustment,
        breakdowns,
    })
}

/// Average, over positions that have graded players, of the position-weighted
/// quality multiplier offset. Capped to `±0.05` EPA.
fn grade_adjustment(grades: &GradeStore, team: TeamId) -> f64 {
    if grades.team(team).is_none() || !grades.has_player_grades(team) {
        return 0.0;
    }
    let mut sum = 0.0;
    let mut graded = 0usize;
    for position in Position::ALL {
        if let Some(avg) = grades.position_average(team, position) {
            sum += (grade_multiplier(avg) - 1.0)
                * position.impact_weight()
                * GRADE_ADJUSTMENT_SCALE;
            graded += 1;
        }
    }
    if graded == 0 {
        return 0.0;
    }
    (sum / graded as f64).clamp(-GRADE_ADJUSTMENT_CAP, GRADE_ADJUSTMENT_CAP)
}

fn compute_breakdowns(
    plays: &PlayStore,
    team: TeamId,
    weights: &BlendWeights,
) -> Result<EpaBreakdowns> {
    let mut sums = [0.0f64; 5];
    let mut counts = [0usize; 5];

    for play in offense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        let Some(epa) = play.epa else { continue };
        let mut situational = false;
        if play.is_red_zone() {
            sums[0] += epa;
            counts[0] += 1;
            situational = true;
        }
        if play.is_third_down() {
            sums[1] += epa;
            counts[1] += 1;
            situational = true;
        }
        if play.is_two_minute() {
            sums[2] += epa;
            counts[2] += 1;
            situational = true;
        }
        if play.is_goal_line() {
            sums[3] += epa;
            counts[3] += 1;
            situational = true;
        }
        if !situational {
            sums[4] += epa;
            counts[4] += 1;
        }
    }

    let mean = |idx: usize| {
        if counts[idx] == 0 {
            0.0
        } else {
            sums[idx] / counts[idx] as f64
        }
    };
    let breakdowns = EpaBreakdowns {
        red_zone: ensure_finite(mean(0), "red zone epa")?,
        third_down: ensure_finite(mean(1), "third down epa")?,
        two_minute: ensure_finite(mean(2), "two minute epa")?,
        goal_line: ensure_finite(mean(3), "goal line epa")?,
        normal: ensure_finite(mean(4), "normal epa")?,
    };
    Ok(breakdowns)
}
