use serde::Serialize;

use crate::error::{EngineError, Result};
use crate::play_store::{PlayRef, PlayStore};
use crate::progressive::BlendWeights;
use crate::types::TeamId;

/// Score returned when a component has nothing to go on.
pub const NEUTRAL_SCORE: f64 = 50.0;

/// Normalised output shared by the four component scorers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ComponentScore {
    /// Normalised 0..100 score.
    pub score: f64,
    /// Season-blended raw statistic the score was derived from.
    pub blended: f64,
    /// True when the team had no usable plays and the neutral score was
    /// substituted.
    pub insufficient_data: bool,
}

impl ComponentScore {
    pub fn neutral() -> Self {
        Self {
            score: NEUTRAL_SCORE,
            blended: 0.0,
            insufficient_data: true,
        }
    }
}

/// Blend a per-season statistic with the progressive weights. Seasons where
/// the statistic is unavailable contribute no weight and the remainder is
/// renormalised; `None` means no season had data at all.
pub(crate) fn blend_seasons<F>(
    weights: &BlendWeights,
    what: &'static str,
    mut stat: F,
) -> Result<Option<f64>>
where
    F: FnMut(u16) -> Option<f64>,
{
    let mut acc = 0.0;
    let mut weight_sum = 0.0;
    for entry in weights.iter() {
        if let Some(value) = stat(entry.season) {
            acc += entry.weight * value;
            weight_sum += entry.weight;
        }
    }
    if weight_sum <= 0.0 {
        return Ok(None);
    }
    let blended = ensure_finite(acc / weight_sum, what)?;
    Ok(Some(blended))
}

/// Non-finite intermediates invalidate the snapshot; surface them instead
/// of letting a NaN leak into a probability.
pub(crate) fn ensure_finite(value: f64, what: &'static str) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::DataCorruption(what))
    }
}

pub(crate) fn clamp_score(value: f64) -> f64 {
    value.clamp(0.0, 100.0)
}

/// Percentage rate with the divide-by-zero fallback all breakdowns share.
pub(crate) fn rate_pct(hits: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        hits as f64 / total as f64 * 100.0
    }
}

pub(crate) fn mean_or_zero(sum: f64, count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

/// All offensive plays for a team across the seasons carrying blend weight.
/// Breakdowns pool these unweighted; only top-level statistics blend.
pub(crate) fn offense_pool<'a>(
    plays: &'a PlayStore,
    team: TeamId,
    weights: &'a BlendWeights,
) -> impl Iterator<Item = PlayRef> + 'a {
    weights
        .iter()
        .flat_map(move |entry| plays.offense_rows(team, entry.season))
}

/// Defensive counterpart of [`offense_pool`].
pub(crate) fn defense_pool<'a>(
    plays: &'a PlayStore,
    team: TeamId,
    weights: &'a BlendWeights,
) -> impl Iterator<Item = PlayRef> + 'a {
    weights
        .iter()
        .flat_map(move |entry| plays.defense_rows(team, entry.season))
}
