use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use crate::aggregate::{aggregate, TeamComponents};
use crate::component::ensure_finite;
use crate::epa_score::{score_epa, EpaBreakdowns, EpaScore};
use crate::error::{EngineError, Result};
use crate::injury_impact::{injury_deduction, EntryImpact};
use crate::matchup::matchup_delta;
use crate::progressive::{season_weights, BlendWeights};
use crate::snapshot::Snapshot;
use crate::success_score::{score_success, SuccessBreakdowns, SuccessScore};
use crate::turnover_score::{score_turnover, TurnoverBreakdowns, TurnoverScore};
use crate::types::{CancelToken, TeamId, WeatherContext};
use crate::validate::preflight;
use crate::weather::weather_score;
use crate::yards_score::{score_yards, YardsBreakdowns, YardsScore};

/// Points added to the home side's raw score before injuries apply.
pub const HOME_FIELD_ADVANTAGE: f64 = 2.5;

/// Slope of the score-difference sigmoid.
pub const SIGMOID_SLOPE: f64 = 0.12;

/// One matchup to score against the installed snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchupRequest {
    pub home: TeamId,
    pub away: TeamId,
    pub week: u8,
    pub season: u16,
    pub weather: Option<WeatherContext>,
}

/// Situational breakdowns for one team, surfaced for display; nothing here
/// feeds back into the scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamDiagnostics {
    pub epa: EpaBreakdowns,
    pub success: SuccessBreakdowns,
    pub yards: YardsBreakdowns,
    pub turnover: TurnoverBreakdowns,
    pub epa_grade_adjustment: f64,
    pub injuries: Vec<EntryImpact>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostics {
    pub home: TeamDiagnostics,
    pub away: TeamDiagnostics,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub home: TeamId,
    pub away: TeamId,
    /// Final scores on 0..100, after home field and injury deductions.
    pub home_score: f64,
    pub away_score: f64,
    pub winner: TeamId,
    /// In `[0.5, 1.0]`; 0.5 is a coin flip.
    pub confidence: f64,
    pub home_components: TeamComponents,
    pub away_components: TeamComponents,
    pub diagnostics: Diagnostics,
}

/// Home win probability from a final score difference.
pub fn win_probability(diff: f64) -> f64 {
    1.0 / (1.0 + (-SIGMOID_SLOPE * diff).exp())
}

struct SideScore {
    epa: EpaScore,
    success: SuccessScore,
    yards: YardsScore,
    turnover: TurnoverScore,
}

fn checkpoint(cancel: &CancelToken) -> Result<()> {
    if cancel.is_cancelled() {
        Err(EngineError::Cancelled)
    } else {
        Ok(())
    }
}

fn score_side(
    snapshot: &Snapshot,
    team: TeamId,
    weights: &BlendWeights,
    cancel: &CancelToken,
) -> Result<SideScore> {
    checkpoint(cancel)?;
    let epa = score_epa(&snapshot.plays, Some(&snapshot.grades), team, weights)?;
    checkpoint(cancel)?;
    let success = score_success(&snapshot.plays, team, weights)?;
    checkpoint(cancel)?;
    let yards = score_yards(&snapshot.plays, team, weights)?;
    checkpoint(cancel)?;
    let turnover = score_turnover(&snapshot.plays, team, weights)?;
    Ok(SideScore {
        epa,
        success,
        yards,
        turnover,
    })
}

/// Score one matchup against a snapshot. Pure: identical inputs against the
/// same snapshot produce bit-identical predictions.
pub fn predict_snapshot(
    snapshot: &Snapshot,
    request: &MatchupRequest,
    cancel: &CancelToken,
) -> Result<Prediction> {
    preflight(snapshot, request.home, request.away, request.week, request.season)?;
    let weights = season_weights(request.week, request.season)?;

    let home_side = score_side(snapshot, request.home, &weights, cancel)?;
    let away_side = score_side(snapshot, request.away, &weights, cancel)?;

    let home_grades = snapshot.grades.team_or_neutral(request.home);
    let away_grades = snapshot.grades.team_or_neutral(request.away);
    let delta_home = matchup_delta(&home_grades, &away_grades);
    let delta_away = matchup_delta(&away_grades, &home_grades);

    let home_injuries = injury_deduction(&snapshot.grades, &snapshot.injuries, request.home);
    let away_injuries = injury_deduction(&snapshot.grades, &snapshot.injuries, request.away);

    let weather = weather_score(request.weather.as_ref());

    let home_components = aggregate(
        &home_side.epa,
        &home_side.success,
        &home_side.yards,
        &home_side.turnover,
        delta_home,
        weather,
        home_injuries.total,
    )?;
    let away_components = aggregate(
        &away_side.epa,
        &away_side.success,
        &away_side.yards,
        &away_side.turnover,
        delta_away,
        weather,
        away_injuries.total,
    )?;

    let home_score = ((home_components.raw + HOME_FIELD_ADVANTAGE)
        * (1.0 - home_injuries.total))
        .clamp(0.0, 100.0);
    let away_score = (away_components.raw * (1.0 - away_injuries.total)).clamp(0.0, 100.0);

    let diff = ensure_finite(home_score - away_score, "score difference")?;
    let p_home = ensure_finite(win_probability(diff), "win probability")?;

    let winner = if p_home >= 0.5 {
        request.home
    } else {
        request.away
    };

    Ok(Prediction {
        home: request.home,
        away: request.away,
        home_score,
        away_score,
        winner,
        confidence: p_home.max(1.0 - p_home),
        home_components,
        away_components,
        diagnostics: Diagnostics {
            home: TeamDiagnostics {
                epa: home_side.epa.breakdowns,
                success: home_side.success.breakdowns,
                yards: home_side.yards.breakdowns,
                turnover: home_side.turnover.breakdowns,
                epa_grade_adjustment: home_side.epa.grade_adjustment,
                injuries: home_injuries.entries,
            },
            away: TeamDiagnostics {
                epa: away_side.epa.breakdowns,
                success: away_side.success.breakdowns,
                yards: away_side.yards.breakdowns,
                turnover: away_side.turnover.breakdowns,
                epa_grade_adjustment: away_side.epa.grade_adjustment,
                injuries: away_injuries.entries,
            },
        },
    })
}

/// Prediction engine holding the current snapshot. Reads clone an `Arc`
/// and compute lock-free; `install` swaps the whole snapshot atomically.
/// A `DataCorruption` failure latches the snapshot as invalid until a new
/// one is installed.
pub struct Engine {
    snapshot: Mutex<Arc<Snapshot>>,
    corrupted: AtomicBool,
}

impl Engine {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: Mutex::new(Arc::new(snapshot)),
            corrupted: AtomicBool::new(false),
        }
    }

    /// Replace the snapshot. Requests already in flight finish against the
    /// snapshot they started with.
    pub fn install(&self, snapshot: Snapshot) {
        let mut guard = self
            .snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::new(snapshot);
        self.corrupted.store(false, Ordering::Release);
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.snapshot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn predict(&self, request: &MatchupRequest) -> Result<Prediction> {
        self.predict_cancellable(request, &CancelToken::new())
    }

    pub fn predict_cancellable(
        &self,
        request: &MatchupRequest,
        cancel: &CancelToken,
    ) -> Result<Prediction> {
        if self.corrupted.load(Ordering::Acquire) {
            return Err(EngineError::DataCorruption(
                "snapshot invalidated by an earlier failure",
            ));
        }
        let snapshot = self.snapshot();
        let result = predict_snapshot(&snapshot, request, cancel);
        if matches!(&result, Err(EngineError::DataCorruption(_))) {
            self.corrupted.store(true, Ordering::Release);
        }
        result
    }
}
