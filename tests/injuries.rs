use rivers::grades::{GradeStore, PlayerGrade, TeamGrades};
use rivers::injury_store::{InjuryEntry, InjuryStore};
use rivers::play_store::{PlayRow, PlayStore};
use rivers::predict::predict_snapshot;
use rivers::types::{InjuryStatus, PlayKind, Position};
use rivers::{CancelToken, MatchupRequest, Snapshot, TeamId};

fn team(code: &str) -> TeamId {
    TeamId::parse(code).unwrap()
}

fn balanced_snapshot() -> Snapshot {
    let mut rows = Vec::new();
    for _ in 0..120 {
        for (pos, def) in [("CIN", "CLE"), ("CLE", "CIN")] {
            rows.push(PlayRow {
                game_id: format!("2025_06_{pos}_{def}"),
                season: 2025,
                week: 6,
                pos_team: team(pos),
                def_team: team(def),
                play_kind: PlayKind::Pass,
                down: Some(1),
                yards_to_go: Some(10),
                yardline_100: 50,
                yards_gained: 5,
                epa: Some(0.0),
                success: false,
                interception: false,
                fumble_lost: false,
                air_yards: None,
                yards_after_catch: None,
                qb_epa: None,
                quarter_seconds_remaining: Some(700),
                game_seconds_remaining: Some(2700),
            });
        }
    }
    let mut grades = GradeStore::default();
    grades.insert_team(team("CIN"), TeamGrades::default());
    grades.insert_team(team("CLE"), TeamGrades::default());
    grades.insert_players(
        team("CIN"),
        vec![
            PlayerGrade {
                player: "Star Quarterback".into(),
                position: Position::Qb,
                grade: 90.0,
            },
            PlayerGrade {
                player: "Clipboard Holder".into(),
                position: Position::Qb,
                grade: 60.0,
            },
        ],
    );
    Snapshot::new(PlayStore::from_rows(rows), grades, InjuryStore::default())
}

fn request() -> MatchupRequest {
    MatchupRequest {
        home: team("CIN"),
        away: team("CLE"),
        week: 6,
        season: 2025,
        weather: None,
    }
}

#[test]
fn elite_qb_out_costs_fourteen_percent() {
    let mut snapshot = balanced_snapshot();
    snapshot.injuries = InjuryStore::from_entries(vec![InjuryEntry::new(
        team("CIN"),
        "Star Quarterback",
        Position::Qb,
        InjuryStatus::Out,
    )]);

    let prediction = predict_snapshot(&snapshot, &request(), &CancelToken::new()).unwrap();
    let deduction = prediction.home_components.injury_deduction;
    assert!((deduction - 0.14).abs() < 1e-12, "deduction was {deduction}");

    // The deduction multiplies the post-home-field score.
    let expected = (prediction.home_components.raw + 2.5) * (1.0 - 0.14);
    assert!((prediction.home_score - expected.clamp(0.0, 100.0)).abs() < 1e-9);
    assert_eq!(prediction.diagnostics.home.injuries.len(), 1);
}

#[test]
fn questionable_star_is_free() {
    let mut snapshot = balanced_snapshot();
    snapshot.injuries = InjuryStore::from_entries(vec![InjuryEntry::new(
        team("CIN"),
        "Star Quarterback",
        Position::Qb,
        InjuryStatus::Questionable,
    )]);

    let prediction = predict_snapshot(&snapshot, &request(), &CancelToken::new()).unwrap();
    assert_eq!(prediction.home_components.injury_deduction, 0.0);
    assert!(prediction.diagnostics.home.injuries.is_empty());
}

#[test]
fn deduction_caps_at_forty_percent() {
    let mut snapshot = balanced_snapshot();
    snapshot.injuries = InjuryStore::from_entries((0..10).map(|i| {
        InjuryEntry::new(
            team("CIN"),
            format!("Quarterback {i}"),
            Position::Qb,
            InjuryStatus::Out,
        )
    }));

    let prediction = predict_snapshot(&snapshot, &request(), &CancelToken::new()).unwrap();
    assert_eq!(prediction.home_components.injury_deduction, 0.40);
    // An even matchup with 40% shaved off the home side flips the pick.
    assert_eq!(prediction.winner, team("CLE"));
}

#[test]
fn injured_opponent_swings_the_probability() {
    let clean = predict_snapshot(&balanced_snapshot(), &request(), &CancelToken::new()).unwrap();

    let mut snapshot = balanced_snapshot();
    snapshot.injuries = InjuryStore::from_entries(vec![InjuryEntry::new(
        team("CIN"),
        "Star Quarterback",
        Position::Qb,
        InjuryStatus::Out,
    )]);
    let hurt = predict_snapshot(&snapshot, &request(), &CancelToken::new()).unwrap();

    assert!(hurt.home_score < clean.home_score);
    assert_eq!(hurt.away_score, clean.away_score);
}
