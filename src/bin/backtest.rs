use std::fs;
use std::path::PathBuf;

use rivers::calibration::{self, Outcome};
use rivers::dataset;
use rivers::predict::predict_snapshot;
use rivers::synthetic::{self, SyntheticConfig};
use rivers::{CancelToken, MatchupRequest, Snapshot, TeamId};

#[derive(Debug, serde::Deserialize)]
struct SlateGame {
    home: TeamId,
    away: TeamId,
    week: u8,
    season: u16,
    #[serde(default)]
    home_won: Option<bool>,
}

// This binary is intentionally simple: it loads one snapshot, predicts a
// slate and prints the model output. No network, no persistence of results;
// it exists for quick manual calibration checks.
fn main() -> anyhow::Result<()> {
    let mut args = std::env::args().skip(1);
    let db_path = args.next().map(PathBuf::from);
    let slate_path = args.next().map(PathBuf::from);

    let snapshot = match &db_path {
        Some(path) => {
            let conn = dataset::open_db(path)?;
            dataset::load_snapshot(&conn)?
        }
        None => {
            eprintln!("no snapshot db given; using a synthetic snapshot");
            synthetic::snapshot(&SyntheticConfig::default())
        }
    };

    let slate = match &slate_path {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<Vec<SlateGame>>(&raw)?
        }
        None => round_robin_slate(&snapshot),
    };

    let cancel = CancelToken::new();
    let mut probs = Vec::new();
    let mut outcomes = Vec::new();

    for game in &slate {
        let request = MatchupRequest {
            home: game.home,
            away: game.away,
            week: game.week,
            season: game.season,
            weather: None,
        };
        match predict_snapshot(&snapshot, &request, &cancel) {
            Ok(prediction) => {
                println!(
                    "{} @ {}  {:>5.1} - {:<5.1}  winner {}  confidence {:.1}%",
                    game.away,
                    game.home,
                    prediction.away_score,
                    prediction.home_score,
                    prediction.winner,
                    prediction.confidence * 100.0,
                );
                if let Some(home_won) = game.home_won {
                    let p_home = if prediction.winner == game.home {
                        prediction.confidence
                    } else {
                        1.0 - prediction.confidence
                    };
                    probs.push(p_home);
                    outcomes.push(if home_won {
                        Outcome::HomeWin
                    } else {
                        Outcome::AwayWin
                    });
                }
            }
            Err(err) => {
                println!("{} @ {}  skipped: {err}", game.away, game.home);
            }
        }
    }

    if !outcomes.is_empty() {
        let metrics = calibration::evaluate(&probs, &outcomes);
        println!(
            "\n{} graded games  brier {:.4}  log loss {:.4}  accuracy {:.1}%",
            metrics.samples,
            metrics.brier,
            metrics.log_loss,
            metrics.accuracy * 100.0,
        );
    }

    Ok(())
}

/// Every pair of graded teams once, home team first. Used when no slate
/// file is supplied.
fn round_robin_slate(snapshot: &Snapshot) -> Vec<SlateGame> {
    let season = snapshot.plays.seasons().max().unwrap_or(2025);
    let teams: Vec<TeamId> = rivers::teams::all()
        .filter(|team| snapshot.grades.contains_team(*team))
        .collect();
    let mut out = Vec::new();
    for (i, home) in teams.iter().enumerate() {
        for away in teams.iter().skip(i + 1) {
            out.push(SlateGame {
                home: *home,
                away: *away,
                week: 6,
                season,
                home_won: None,
            });
        }
    }
    out
}
