use serde::Serialize;

use crate::component::{
    blend_seasons, clamp_score, defense_pool, mean_or_zero, offense_pool, rate_pct, ComponentScore,
};
use crate::error::Result;
use crate::play_store::PlayStore;
use crate::progressive::BlendWeights;
use crate::types::{PlayKind, TeamId};

/// Yards-per-play band mapped onto the 0..100 scale: 3.0 y/p scores 0,
/// 7.0 y/p scores 100.
const YPP_FLOOR: f64 = 3.0;
const YPP_SPAN: f64 = 4.0;

/// A gain this long counts as an explosive play.
const EXPLOSIVE_YARDS: i16 = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct YardsBreakdowns {
    pub yards_per_play: f64,
    /// Yards allowed per opponent scrimmage play.
    pub defense_allowed_per_play: f64,
    pub per_pass_attempt: f64,
    pub per_carry: f64,
    /// Mean yards after catch where the field is recorded.
    pub yac_mean: f64,
    /// Share of scrimmage plays gaining 20+ yards, in percent.
    pub explosive_rate: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct YardsScore {
    pub component: ComponentScore,
    pub breakdowns: YardsBreakdowns,
}

/// Yardage component: season-blended yards per scrimmage play on the
/// 3..7 band.
pub fn score_yards(plays: &PlayStore, team: TeamId, weights: &BlendWeights) -> Result<YardsScore> {
    let blended = blend_seasons(weights, "yards blend", |season| {
        let mut yards = 0.0;
        let mut scrimmage = 0usize;
        for play in plays.offense_rows(team, season) {
            if !play.is_scrimmage() {
                continue;
            }
            scrimmage += 1;
            yards += f64::from(play.yards_gained);
        }
        if scrimmage == 0 {
            None
        } else {
            Some(yards / scrimmage as f64)
        }
    })?;

    let breakdowns = compute_breakdowns(plays, team, weights);

    let component = match blended {
        Some(ypp) => ComponentScore {
            score: clamp_score((ypp - YPP_FLOOR) / YPP_SPAN * 100.0),
            blended: ypp,
            insufficient_data: false,
        },
        None => ComponentScore::neutral(),
    };

    Ok(YardsScore {
        component,
        breakdowns,
    })
}

fn compute_breakdowns(plays: &PlayStore, team: TeamId, weights: &BlendWeights) -> YardsBreakdowns {
    let mut scrimmage = 0usize;
    let mut yards = 0.0;
    let mut pass = (0.0f64, 0usize);
    let mut run = (0.0f64, 0usize);
    let mut yac = (0.0f64, 0usize);
    let mut explosive = 0usize;

    for play in offense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        scrimmage += 1;
        let gained = f64::from(play.yards_gained);
        yards += gained;
        match play.kind {
            PlayKind::Pass => {
                pass.0 += gained;
                pass.1 += 1;
            }
            PlayKind::Run => {
                run.0 += gained;
                run.1 += 1;
            }
            _ => {}
        }
        if let Some(after_catch) = play.yards_after_catch {
            yac.0 += after_catch;
            yac.1 += 1;
        }
        if play.yards_gained >= EXPLOSIVE_YARDS {
            explosive += 1;
        }
    }

    let mut faced = 0usize;
    let mut allowed = 0.0;
    for play in defense_pool(plays, team, weights) {
        if !play.is_scrimmage() {
            continue;
        }
        faced += 1;
        allowed += f64::from(play.yards_gained);
    }

    YardsBreakdowns {
        yards_per_play: mean_or_zero(yards, scrimmage),
        defense_allowed_per_play: mean_or_zero(allowed, faced),
        per_pass_attempt: mean_or_zero(pass.0, pass.1),
        per_carry: mean_or_zero(run.0, run.1),
        yac_mean: mean_or_zero(yac.0, yac.1),
        explosive_rate: rate_pct(explosive, scrimmage),
    }
}
