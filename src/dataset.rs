//! Sqlite persistence for snapshot inputs.
//!
//! A snapshot database holds the four input collections (plays, team
//! grades, player grades, injuries) so batches can be rebuilt without
//! re-ingesting upstream feeds. Writes replace whole tables inside a
//! transaction, matching the snapshot's swap-wholesale lifecycle.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use rusqlite::{params, Connection};

use crate::grades::{PlayerGrade, TeamGrades};
use crate::injury_store::InjuryEntry;
use crate::play_store::PlayRow;
use crate::snapshot::Snapshot;
use crate::types::{InjuryStatus, PlayKind, Position, TeamId};

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        CREATE TABLE IF NOT EXISTS plays (
            play_id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id TEXT NOT NULL,
            season INTEGER NOT NULL,
            week INTEGER NOT NULL,
            pos_team TEXT NOT NULL,
            def_team TEXT NOT NULL,
            play_kind TEXT NOT NULL,
            down INTEGER NULL,
            yards_to_go INTEGER NULL,
            yardline_100 INTEGER NOT NULL,
            yards_gained INTEGER NOT NULL,
            epa REAL NULL,
            success INTEGER NOT NULL,
            interception INTEGER NOT NULL,
            fumble_lost INTEGER NOT NULL,
            air_yards REAL NULL,
            yards_after_catch REAL NULL,
            qb_epa REAL NULL,
            quarter_seconds_remaining INTEGER NULL,
            game_seconds_remaining INTEGER NULL
        );
        CREATE INDEX IF NOT EXISTS idx_plays_pos_team ON plays(pos_team, season);
        CREATE INDEX IF NOT EXISTS idx_plays_def_team ON plays(def_team, season);

        CREATE TABLE IF NOT EXISTS team_grades (
            team TEXT PRIMARY KEY,
            passing REAL NOT NULL,
            rushing REAL NOT NULL,
            receiving REAL NOT NULL,
            pass_blocking REAL NOT NULL,
            run_blocking REAL NOT NULL,
            pass_rush REAL NOT NULL,
            run_defense REAL NOT NULL,
            coverage REAL NOT NULL,
            tackling REAL NOT NULL,
            overall_offense REAL NOT NULL,
            overall_defense REAL NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS player_grades (
            team TEXT NOT NULL,
            player TEXT NOT NULL,
            position TEXT NOT NULL,
            grade REAL NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (team, player, position)
        );

        CREATE TABLE IF NOT EXISTS injuries (
            injury_id INTEGER PRIMARY KEY AUTOINCREMENT,
            team TEXT NOT NULL,
            player TEXT NOT NULL,
            position TEXT NULL,
            status TEXT NULL,
            note TEXT NOT NULL,
            long_term INTEGER NOT NULL,
            preseason INTEGER NOT NULL,
            backup_rookie INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_injuries_team ON injuries(team);
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

/// Replace the whole play table. Plays are immutable records, so there is
/// no per-row upsert; a batch is all or nothing.
pub fn replace_plays(conn: &mut Connection, rows: &[PlayRow]) -> Result<usize> {
    let tx = conn.transaction().context("begin plays transaction")?;
    tx.execute("DELETE FROM plays", [])
        .context("clear plays table")?;
    {
        let mut stmt = tx
            .prepare(
                r#"
                INSERT INTO plays (
                    game_id, season, week, pos_team, def_team, play_kind,
                    down, yards_to_go, yardline_100, yards_gained,
                    epa, success, interception, fumble_lost,
                    air_yards, yards_after_catch, qb_epa,
                    quarter_seconds_remaining, game_seconds_remaining
                ) VALUES (
                    ?1, ?2, ?3, ?4, ?5, ?6,
                    ?7, ?8, ?9, ?10,
                    ?11, ?12, ?13, ?14,
                    ?15, ?16, ?17,
                    ?18, ?19
                )
                "#,
            )
            .context("prepare play insert")?;
        for row in rows {
            stmt.execute(params![
                row.game_id,
                row.season as i64,
                row.week as i64,
                row.pos_team.as_str(),
                row.def_team.as_str(),
                row.play_kind.code(),
                row.down.map(i64::from),
                row.yards_to_go.map(i64::from),
                row.yardline_100 as i64,
                row.yards_gained as i64,
                row.epa,
                bool_to_i64(row.success),
                bool_to_i64(row.interception),
                bool_to_i64(row.fumble_lost),
                row.air_yards,
                row.yards_after_catch,
                row.qb_epa,
                row.quarter_seconds_remaining.map(i64::from),
                row.game_seconds_remaining.map(i64::from),
            ])
            .context("insert play row")?;
        }
    }
    tx.commit().context("commit plays transaction")?;
    Ok(rows.len())
}

pub fn replace_team_grades(
    conn: &mut Connection,
    grades: &HashMap<TeamId, TeamGrades>,
) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin team grades transaction")?;
    tx.execute("DELETE FROM team_grades", [])
        .context("clear team grades")?;
    {
        let mut stmt = tx
            .prepare(
                r#"
                INSERT INTO team_grades (
                    team, passing, rushing, receiving, pass_blocking,
                    run_blocking, pass_rush, run_defense, coverage, tackling,
                    overall_offense, overall_defense, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)
                "#,
            )
            .context("prepare team grade insert")?;
        for (team, g) in grades {
            stmt.execute(params![
                team.as_str(),
                g.passing,
                g.rushing,
                g.receiving,
                g.pass_blocking,
                g.run_blocking,
                g.pass_rush,
                g.run_defense,
                g.coverage,
                g.tackling,
                g.overall_offense,
                g.overall_defense,
                now,
            ])
            .context("insert team grade")?;
        }
    }
    tx.commit().context("commit team grades transaction")?;
    Ok(grades.len())
}

pub fn replace_player_grades(
    conn: &mut Connection,
    grades: &HashMap<TeamId, Vec<PlayerGrade>>,
) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let mut written = 0usize;
    let tx = conn
        .transaction()
        .context("begin player grades transaction")?;
    tx.execute("DELETE FROM player_grades", [])
        .context("clear player grades")?;
    {
        let mut stmt = tx
            .prepare(
                "INSERT OR REPLACE INTO player_grades (team, player, position, grade, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )
            .context("prepare player grade insert")?;
        for (team, players) in grades {
            for entry in players {
                stmt.execute(params![
                    team.as_str(),
                    entry.player,
                    entry.position.code(),
                    entry.grade,
                    now,
                ])
                .context("insert player grade")?;
                written += 1;
            }
        }
    }
    tx.commit().context("commit player grades transaction")?;
    Ok(written)
}

pub fn replace_injuries(conn: &mut Connection, entries: &[InjuryEntry]) -> Result<usize> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin injuries transaction")?;
    tx.execute("DELETE FROM injuries", [])
        .context("clear injuries")?;
    {
        let mut stmt = tx
            .prepare(
                r#"
                INSERT INTO injuries (
                    team, player, position, status, note,
                    long_term, preseason, backup_rookie, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
                "#,
            )
            .context("prepare injury insert")?;
        for entry in entries {
            stmt.execute(params![
                entry.team.as_str(),
                entry.player,
                entry.position.map(Position::code),
                entry.status.map(InjuryStatus::code),
                entry.note,
                bool_to_i64(entry.long_term),
                bool_to_i64(entry.preseason),
                bool_to_i64(entry.backup_rookie),
                now,
            ])
            .context("insert injury")?;
        }
    }
    tx.commit().context("commit injuries transaction")?;
    Ok(entries.len())
}

/// Write all four input collections in one call.
pub fn save_snapshot_inputs(
    conn: &mut Connection,
    plays: &[PlayRow],
    team_grades: &HashMap<TeamId, TeamGrades>,
    player_grades: &HashMap<TeamId, Vec<PlayerGrade>>,
    injuries: &[InjuryEntry],
) -> Result<()> {
    replace_plays(conn, plays)?;
    replace_team_grades(conn, team_grades)?;
    replace_player_grades(conn, player_grades)?;
    replace_injuries(conn, injuries)?;
    Ok(())
}

/// Read the whole database back into an in-memory snapshot.
pub fn load_snapshot(conn: &Connection) -> Result<Snapshot> {
    let plays = load_plays(conn)?;
    let team_grades = load_team_grades(conn)?;
    let player_grades = load_player_grades(conn)?;
    let injuries = load_injuries(conn)?;
    Ok(Snapshot::from_parts(
        plays,
        team_grades,
        player_grades,
        injuries,
    ))
}

pub fn load_plays(conn: &Connection) -> Result<Vec<PlayRow>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT
                game_id, season, week, pos_team, def_team, play_kind,
                down, yards_to_go, yardline_100, yards_gained,
                epa, success, interception, fumble_lost,
                air_yards, yards_after_catch, qb_epa,
                quarter_seconds_remaining, game_seconds_remaining
            FROM plays
            ORDER BY play_id ASC
            "#,
        )
        .context("prepare load plays query")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, Option<i64>>(6)?,
                row.get::<_, Option<i64>>(7)?,
                row.get::<_, i64>(8)?,
                row.get::<_, i64>(9)?,
                row.get::<_, Option<f64>>(10)?,
                row.get::<_, i64>(11)?,
                row.get::<_, i64>(12)?,
                row.get::<_, i64>(13)?,
                row.get::<_, Option<f64>>(14)?,
                row.get::<_, Option<f64>>(15)?,
                row.get::<_, Option<f64>>(16)?,
                row.get::<_, Option<i64>>(17)?,
                row.get::<_, Option<i64>>(18)?,
            ))
        })
        .context("query plays")?;

    let mut out = Vec::new();
    for row in rows {
        let (
            game_id,
            season,
            week,
            pos_team,
            def_team,
            play_kind,
            down,
            yards_to_go,
            yardline_100,
            yards_gained,
            epa,
            success,
            interception,
            fumble_lost,
            air_yards,
            yards_after_catch,
            qb_epa,
            quarter_seconds_remaining,
            game_seconds_remaining,
        ) = row.context("decode play row")?;
        let pos_team = parse_team(&pos_team)?;
        let def_team = parse_team(&def_team)?;
        out.push(PlayRow {
            game_id,
            season: season as u16,
            week: week as u8,
            pos_team,
            def_team,
            play_kind: PlayKind::from_code(&play_kind),
            down: down.map(|v| v as u8),
            yards_to_go: yards_to_go.map(|v| v as u16),
            yardline_100: yardline_100 as u8,
            yards_gained: yards_gained as i16,
            epa,
            success: success != 0,
            interception: interception != 0,
            fumble_lost: fumble_lost != 0,
            air_yards,
            yards_after_catch,
            qb_epa,
            quarter_seconds_remaining: quarter_seconds_remaining.map(|v| v as u32),
            game_seconds_remaining: game_seconds_remaining.map(|v| v as u32),
        });
    }
    Ok(out)
}

pub fn load_team_grades(conn: &Connection) -> Result<HashMap<TeamId, TeamGrades>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT team, passing, rushing, receiving, pass_blocking, run_blocking,
                   pass_rush, run_defense, coverage, tackling,
                   overall_offense, overall_defense
            FROM team_grades
            "#,
        )
        .context("prepare load team grades")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                TeamGrades {
                    passing: row.get(1)?,
                    rushing: row.get(2)?,
                    receiving: row.get(3)?,
                    pass_blocking: row.get(4)?,
                    run_blocking: row.get(5)?,
                    pass_rush: row.get(6)?,
                    run_defense: row.get(7)?,
                    coverage: row.get(8)?,
                    tackling: row.get(9)?,
                    overall_offense: row.get(10)?,
                    overall_defense: row.get(11)?,
                },
            ))
        })
        .context("query team grades")?;

    let mut out = HashMap::new();
    for row in rows {
        let (team, grades) = row.context("decode team grade row")?;
        out.insert(parse_team(&team)?, grades);
    }
    Ok(out)
}

pub fn load_player_grades(conn: &Connection) -> Result<HashMap<TeamId, Vec<PlayerGrade>>> {
    let mut stmt = conn
        .prepare("SELECT team, player, position, grade FROM player_grades")
        .context("prepare load player grades")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, f64>(3)?,
            ))
        })
        .context("query player grades")?;

    let mut out: HashMap<TeamId, Vec<PlayerGrade>> = HashMap::new();
    for row in rows {
        let (team, player, position, grade) = row.context("decode player grade row")?;
        let Some(position) = Position::from_code(&position) else {
            log::warn!("skipping player grade for {player}: unknown position {position:?}");
            continue;
        };
        out.entry(parse_team(&team)?).or_default().push(PlayerGrade {
            player,
            position,
            grade,
        });
    }
    Ok(out)
}

pub fn load_injuries(conn: &Connection) -> Result<HashMap<TeamId, Vec<InjuryEntry>>> {
    let mut stmt = conn
        .prepare(
            "SELECT team, player, position, status, note, long_term, preseason, backup_rookie
             FROM injuries ORDER BY injury_id ASC",
        )
        .context("prepare load injuries")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, Option<String>>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, i64>(5)?,
                row.get::<_, i64>(6)?,
                row.get::<_, i64>(7)?,
            ))
        })
        .context("query injuries")?;

    let mut out: HashMap<TeamId, Vec<InjuryEntry>> = HashMap::new();
    for row in rows {
        let (team, player, position, status, note, long_term, preseason, backup_rookie) =
            row.context("decode injury row")?;
        let team = parse_team(&team)?;
        out.entry(team).or_default().push(InjuryEntry {
            team,
            player,
            position: position.as_deref().and_then(Position::from_code),
            status: status.as_deref().and_then(InjuryStatus::from_code),
            note,
            long_term: long_term != 0,
            preseason: preseason != 0,
            backup_rookie: backup_rookie != 0,
        });
    }
    Ok(out)
}

fn parse_team(raw: &str) -> Result<TeamId> {
    TeamId::parse(raw).with_context(|| format!("invalid team abbreviation {raw:?} in database"))
}

fn bool_to_i64(v: bool) -> i64 {
    if v {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grades::PlayerGrade;
    use crate::types::InjuryStatus;

    fn sample_play() -> PlayRow {
        PlayRow {
            game_id: "2025_01_BUF_MIA".into(),
            season: 2025,
            week: 1,
            pos_team: TeamId::parse("BUF").unwrap(),
            def_team: TeamId::parse("MIA").unwrap(),
            play_kind: PlayKind::Pass,
            down: Some(1),
            yards_to_go: Some(10),
            yardline_100: 75,
            yards_gained: 12,
            epa: Some(0.43),
            success: true,
            interception: false,
            fumble_lost: false,
            air_yards: Some(8.0),
            yards_after_catch: Some(4.0),
            qb_epa: Some(0.40),
            quarter_seconds_remaining: Some(812),
            game_seconds_remaining: Some(3512),
        }
    }

    #[test]
    fn round_trips_all_four_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        let buf = TeamId::parse("BUF").unwrap();
        let plays = vec![sample_play()];
        let mut team_grades = HashMap::new();
        team_grades.insert(
            buf,
            TeamGrades {
                passing: 88.5,
                ..TeamGrades::default()
            },
        );
        let mut player_grades = HashMap::new();
        player_grades.insert(
            buf,
            vec![PlayerGrade {
                player: "Josh Allen".into(),
                position: Position::Qb,
                grade: 92.0,
            }],
        );
        let injuries = vec![InjuryEntry::new(
            buf,
            "Josh Allen",
            Position::Qb,
            InjuryStatus::Questionable,
        )];

        save_snapshot_inputs(&mut conn, &plays, &team_grades, &player_grades, &injuries).unwrap();

        let snapshot = load_snapshot(&conn).unwrap();
        assert_eq!(snapshot.plays.len(), 1);
        assert_eq!(snapshot.plays.team_play_count(buf), 1);
        assert!((snapshot.grades.team(buf).unwrap().passing - 88.5).abs() < 1e-12);
        assert_eq!(snapshot.grades.players(buf).len(), 1);
        assert_eq!(snapshot.injuries.report_for(buf).len(), 1);
        assert_eq!(
            snapshot.injuries.report_for(buf)[0].status,
            Some(InjuryStatus::Questionable)
        );

        let loaded = load_plays(&conn).unwrap();
        assert_eq!(loaded, plays);
    }

    #[test]
    fn replace_overwrites_previous_batch() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();

        replace_plays(&mut conn, &[sample_play(), sample_play()]).unwrap();
        replace_plays(&mut conn, &[sample_play()]).unwrap();
        assert_eq!(load_plays(&conn).unwrap().len(), 1);
    }

    #[test]
    fn unknown_injury_codes_survive_as_none() {
        let mut conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        let buf = TeamId::parse("BUF").unwrap();
        let entry = InjuryEntry::from_report_row(buf, "Mystery Man", "WING", "SUSPENDED", "");
        replace_injuries(&mut conn, &[entry]).unwrap();
        let loaded = load_injuries(&conn).unwrap();
        let entries = loaded.get(&buf).unwrap();
        assert_eq!(entries[0].position, None);
        assert_eq!(entries[0].status, None);
    }
}
