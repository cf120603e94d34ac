//! RIVERS: a deterministic NFL matchup scoring and win-probability engine.
//!
//! Given play-by-play history, unit and player grades, an injury report and
//! game-day conditions, [`predict`](Engine::predict) produces a pair of
//! team scores, a winner and a calibrated confidence for one matchup. The
//! whole pipeline is a single pass over an immutable [`Snapshot`]; two
//! predictions over the same snapshot and inputs are bit-identical.
//!
//! Data ingestion, scraping, configuration and presentation live outside
//! this crate. The snapshot surface (`Snapshot::from_parts`, the sqlite
//! helpers in [`dataset`]) is how collaborators hand data in.

pub mod aggregate;
pub mod calibration;
mod component;
pub mod dataset;
pub mod epa_score;
pub mod error;
pub mod grades;
pub mod injury_impact;
pub mod injury_store;
pub mod matchup;
pub mod play_store;
pub mod predict;
pub mod progressive;
pub mod snapshot;
pub mod success_score;
pub mod synthetic;
pub mod teams;
pub mod turnover_score;
pub mod types;
pub mod validate;
pub mod weather;
pub mod yards_score;

pub use aggregate::TeamComponents;
pub use component::{ComponentScore, NEUTRAL_SCORE};
pub use error::{EngineError, Result};
pub use predict::{
    predict_snapshot, Diagnostics, Engine, MatchupRequest, Prediction, TeamDiagnostics,
};
pub use snapshot::Snapshot;
pub use types::{
    CancelToken, InjuryStatus, PlayKind, Position, Precipitation, TeamId, Venue, WeatherContext,
};
