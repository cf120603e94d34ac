use serde::Serialize;

use crate::component::{
    blend_seasons, clamp_score, defense_pool, offense_pool, rate_pct, ComponentScore,
};
use crate::error::Result;
use crate::play_store::PlayStore;
use crate::progressive::BlendWeights;
use crate::types::TeamId;

/// Success rates on situational subsets, plus the defensive stop rate,
/// all in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SuccessBreakdowns {
    pub offense: f64,
    /// Share of opponent scrimmage plays held to negative EPA.
    pub stop_rate: f64,
    pub red_zone: f64,
    pub third_down: f64,
    pub goal_line: f64,
    pub two_minute: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SuccessScore {
    pub component: ComponentScore,
    pub breakdowns: SuccessBreakdowns,
}

/// Efficiency component: share of scrimmage plays with positive EPA. The
/// rate is already on the 0..100 scale, so normalisation is the identity.
pub fn score_success(
    plays: &PlayStore,
    team: TeamId,
    weights: &BlendWeights,
) -> Result<SuccessScore> {
    let blended = blend_seasons(weights, "success blend", |season| {
        let mut scrimmage = 0usize;
        let mut successes = 0usize;
        for play in plays.offense_rows(team, season) {
            if !play.is_scrimmage() {
                continue;
            }
            scrimmage += 1;
            if play.success {
                successes += 1;
            }
        }
        if scrimmage == 0 {
            None
        } else {
            Some(successes as f64 / scrimmage as f64 * 100.0)
        }
    })?;

    let breakdowns = compute_breakdowns(plays, team, weights);

    let component = match blended {
        Some(rate) => ComponentScore {
            score: clamp_score(rate),
            blended: rate,
            insufficient_data: false,
        },
        None => ComponentScore::neutral(),
    };

    Ok(SuccessScore {
        component,
        breakdowns,
    })
}

fn compute_breakdowns(plays: &PlayStore, team: TeamId, weights: &BlendWeights) -> SuccessBreakdowns {
    let mut total = 0usize;
    let mut hits = 0usize;
    let mut red = (0usize, 0usize);
    let mut third = (0usize, 0usize);
    let mut goal = (0usize, 0usize);
    let mut two_min = (0usize, 0usize);

    for play in offense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        total += 1;
        let success = play.success;
        if success {
            hits += 1;
        }
        if play.is_red_zone() {
            red.1 += 1;
            if success {
                red.0 += 1;
            }
        }
        if play.is_third_down() {
            third.1 += 1;
            if success {
                third.0 += 1;
            }
        }
        if play.is_goal_line() {
            goal.1 += 1;
            if success {
                goal.0 += 1;
            }
        }
        if play.is_two_minute() {
            two_min.1 += 1;
            if success {
                two_min.0 += 1;
            }
        }
    }

    let mut stops = 0usize;
    let mut faced = 0usize;
    for play in defense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        faced += 1;
        if play.epa.map_or(false, |epa| epa < 0.0) {
            stops += 1;
        }
    }

    SuccessBreakdowns {
        offense: rate_pct(hits, total),
        stop_rate: rate_pct(stops, faced),
        red_zone: rate_pct(red.0, red.1),
        third_down: rate_pct(third.0, third.1),
        goal_line: rate_pct(goal.0, goal.1),
        two_minute: rate_pct(two_min.0, two_min.1),
    }
}
