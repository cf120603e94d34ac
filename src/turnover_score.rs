use serde::Serialize;

use crate::component::{
    blend_seasons, clamp_score, defense_pool, offense_pool, rate_pct, ComponentScore,
};
use crate::error::Result;
use crate::play_store::PlayStore;
use crate::progressive::BlendWeights;
use crate::types::{PlayKind, TeamId};

/// Turnover-rate band, in percent of scrimmage plays: 1.5% giveaway rate
/// scores 100, 4.0% scores 0.
const RATE_FLOOR: f64 = 1.5;
const RATE_SPAN: f64 = 2.5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TurnoverBreakdowns {
    /// Interceptions per pass attempt, percent.
    pub int_rate: f64,
    /// Lost fumbles per touch (pass or carry), percent.
    pub fumble_rate: f64,
    /// Takeaways forced per opponent scrimmage play, percent.
    pub takeaway_rate: f64,
    pub red_zone_rate: f64,
    pub third_down_rate: f64,
    pub two_minute_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TurnoverScore {
    pub component: ComponentScore,
    pub breakdowns: TurnoverBreakdowns,
}

/// Ball-security component. Inverse normalisation: fewer giveaways per
/// scrimmage play is a higher score.
pub fn score_turnover(
    plays: &PlayStore,
    team: TeamId,
    weights: &BlendWeights,
) -> Result<TurnoverScore> {
    let blended = blend_seasons(weights, "turnover blend", |season| {
        let mut scrimmage = 0usize;
        let mut turnovers = 0usize;
        for play in plays.offense_rows(team, season) {
            if !play.is_scrimmage() {
                continue;
            }
            scrimmage += 1;
            if play.is_turnover() {
                turnovers += 1;
            }
        }
        if scrimmage == 0 {
            None
        } else {
            Some(turnovers as f64 / scrimmage as f64 * 100.0)
        }
    })?;

    let breakdowns = compute_breakdowns(plays, team, weights);

    let component = match blended {
        Some(rate) => ComponentScore {
            score: clamp_score(100.0 - (rate - RATE_FLOOR) / RATE_SPAN * 100.0),
            blended: rate,
            insufficient_data: false,
        },
        None => ComponentScore::neutral(),
    };

    Ok(TurnoverScore {
        component,
        breakdowns,
    })
}

fn compute_breakdowns(
    plays: &PlayStore,
    team: TeamId,
    weights: &BlendWeights,
) -> TurnoverBreakdowns {
    let mut passes = 0usize;
    let mut interceptions = 0usize;
    let mut touches = 0usize;
    let mut fumbles = 0usize;
    let mut red = (0usize, 0usize);
    let mut third = (0usize, 0usize);
    let mut two_min = (0usize, 0usize);

    for play in offense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        let turnover = play.is_turnover();
        match play.kind {
            PlayKind::Pass => {
                passes += 1;
                touches += 1;
                if play.interception {
                    interceptions += 1;
                }
            }
            PlayKind::Run => {
                touches += 1;
            }
            _ => {}
        }
        if play.fumble_lost {
            fumbles += 1;
        }
        if play.is_red_zone() {
            red.1 += 1;
            if turnover {
                red.0 += 1;
            }
        }
        if play.is_third_down() {
            third.1 += 1;
            if turnover {
                third.0 += 1;
            }
        }
        if play.is_two_minute() {
            two_min.1 += 1;
            if turnover {
                two_min.0 += 1;
            }
        }
    }

    let mut faced = 0usize;
    let mut takeaways = 0usize;
    for play in defense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        faced += 1;
        if play.is_turnover() {
            takeaways += 1;
        }
    }

    TurnoverBreakdowns {
        int_rate: rate_pct(interceptions, passes),
        fumble_rate: rate_pct(fumbles, touches),
        takeaway_rate: rate_pct(takeaways, faced),
        red_zone_rate: rate_pct(red.0, red.1),
        third_down_rate: rate_pct(third.0, third.1),
        two_minute_rate: rate_pct(two_min.0, two_min.1),
    }
}
