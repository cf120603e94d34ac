use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::{PlayKind, TeamId};

/// One scrimmage or special-teams play as supplied by the snapshot loader.
/// Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayRow {
    pub game_id: String,
    pub season: u16,
    pub week: u8,
    pub pos_team: TeamId,
    pub def_team: TeamId,
    pub play_kind: PlayKind,
    #[serde(default)]
    pub down: Option<u8>,
    #[serde(default)]
    pub yards_to_go: Option<u16>,
    pub yardline_100: u8,
    pub yards_gained: i16,
    #[serde(default)]
    pub epa: Option<f64>,
    pub success: bool,
    #[serde(default)]
    pub interception: bool,
    #[serde(default)]
    pub fumble_lost: bool,
    #[serde(default)]
    pub air_yards: Option<f64>,
    #[serde(default)]
    pub yards_after_catch: Option<f64>,
    #[serde(default)]
    pub qb_epa: Option<f64>,
    #[serde(default)]
    pub quarter_seconds_remaining: Option<u32>,
    #[serde(default)]
    pub game_seconds_remaining: Option<u32>,
}

/// Borrowed numeric view of one stored play. Cheap to copy; scorers stream
/// these without touching the boundary representation.
#[derive(Debug, Clone, Copy)]
pub struct PlayRef {
    pub season: u16,
    pub week: u8,
    pub pos_team: TeamId,
    pub def_team: TeamId,
    pub kind: PlayKind,
    pub down: Option<u8>,
    pub yardline_100: u8,
    pub yards_gained: i16,
    pub epa: Option<f64>,
    pub success: bool,
    pub interception: bool,
    pub fumble_lost: bool,
    pub yards_after_catch: Option<f64>,
    pub quarter_seconds_remaining: Option<u32>,
    pub game_seconds_remaining: Option<u32>,
}

impl PlayRef {
    pub fn is_scrimmage(&self) -> bool {
        self.kind.is_scrimmage()
    }

    /// Red zone: inside the opponent 20.
    pub fn is_red_zone(&self) -> bool {
        self.yardline_100 <= 20
    }

    /// Goal line: inside the opponent 5.
    pub fn is_goal_line(&self) -> bool {
        self.yardline_100 <= 5
    }

    pub fn is_third_down(&self) -> bool {
        self.down == Some(3)
    }

    /// Final two minutes of a quarter or of the game.
    pub fn is_two_minute(&self) -> bool {
        self.quarter_seconds_remaining.map_or(false, |s| s <= 120)
            || self.game_seconds_remaining.map_or(false, |s| s <= 120)
    }

    pub fn is_turnover(&self) -> bool {
        self.interception || self.fumble_lost
    }
}

/// Contiguous per-field columns for one `(team, season)` group.
#[derive(Debug, Default, Clone)]
struct PlayColumns {
    opponent: Vec<TeamId>,
    week: Vec<u8>,
    kind: Vec<PlayKind>,
    down: Vec<Option<u8>>,
    yardline_100: Vec<u8>,
    yards_gained: Vec<i16>,
    epa: Vec<Option<f64>>,
    success: Vec<bool>,
    interception: Vec<bool>,
    fumble_lost: Vec<bool>,
    yards_after_catch: Vec<Option<f64>>,
    quarter_seconds_remaining: Vec<Option<u32>>,
    game_seconds_remaining: Vec<Option<u32>>,
}

impl PlayColumns {
    fn push(&mut self, opponent: TeamId, row: &PlayRow) {
        self.opponent.push(opponent);
        self.week.push(row.week);
        self.kind.push(row.play_kind);
        self.down.push(row.down);
        self.yardline_100.push(row.yardline_100);
        self.yards_gained.push(row.yards_gained);
        self.epa.push(row.epa);
        self.success.push(row.success);
        self.interception.push(row.interception);
        self.fumble_lost.push(row.fumble_lost);
        self.yards_after_catch.push(row.yards_after_catch);
        self.quarter_seconds_remaining
            .push(row.quarter_seconds_remaining);
        self.game_seconds_remaining.push(row.game_seconds_remaining);
    }

    fn len(&self) -> usize {
        self.kind.len()
    }

    fn get(&self, idx: usize, own: TeamId, season: u16, own_is_offense: bool) -> PlayRef {
        let (pos_team, def_team) = if own_is_offense {
            (own, self.opponent[idx])
        } else {
            (self.opponent[idx], own)
        };
        PlayRef {
            season,
            week: self.week[idx],
            pos_team,
            def_team,
            kind: self.kind[idx],
            down: self.down[idx],
            yardline_100: self.yardline_100[idx],
            yards_gained: self.yards_gained[idx],
            epa: self.epa[idx],
            success: self.success[idx],
            interception: self.interception[idx],
            fumble_lost: self.fumble_lost[idx],
            yards_after_catch: self.yards_after_catch[idx],
            quarter_seconds_remaining: self.quarter_seconds_remaining[idx],
            game_seconds_remaining: self.game_seconds_remaining[idx],
        }
    }
}

/// Columnar play-by-play storage. Plays are grouped by `(team, season)`
/// twice, once per side of the ball, so every scorer is a streaming
/// reduction over one group with no per-filter allocation.
#[derive(Debug, Default, Clone)]
pub struct PlayStore {
    offense: HashMap<(TeamId, u16), PlayColumns>,
    defense: HashMap<(TeamId, u16), PlayColumns>,
    seasons: BTreeSet<u16>,
    total: usize,
}

impl PlayStore {
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = PlayRow>,
    {
        let mut store = Self::default();
        for row in rows {
            store.push(&row);
        }
        store
    }

    fn push(&mut self, row: &PlayRow) {
        self.offense
            .entry((row.pos_team, row.season))
            .or_default()
            .push(row.def_team, row);
        self.defense
            .entry((row.def_team, row.season))
            .or_default()
            .push(row.pos_team, row);
        self.seasons.insert(row.season);
        self.total += 1;
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    pub fn seasons(&self) -> impl Iterator<Item = u16> + '_ {
        self.seasons.iter().copied()
    }

    pub fn season_count(&self) -> usize {
        self.seasons.len()
    }

    /// Offensive plays a team ran in one season.
    pub fn offense_count(&self, team: TeamId, season: u16) -> usize {
        self.offense
            .get(&(team, season))
            .map_or(0, PlayColumns::len)
    }

    /// All offensive plays for a team across loaded seasons.
    pub fn team_play_count(&self, team: TeamId) -> usize {
        self.offense
            .iter()
            .filter(|((t, _), _)| *t == team)
            .map(|(_, cols)| cols.len())
            .sum()
    }

    pub(crate) fn offense_rows(
        &self,
        team: TeamId,
        season: u16,
    ) -> impl Iterator<Item = PlayRef> + '_ {
        self.offense
            .get(&(team, season))
            .into_iter()
            .flat_map(move |cols| (0..cols.len()).map(move |i| cols.get(i, team, season, true)))
    }

    pub(crate) fn defense_rows(
        &self,
        team: TeamId,
        season: u16,
    ) -> impl Iterator<Item = PlayRef> + '_ {
        self.defense
            .get(&(team, season))
            .into_iter()
            .flat_map(move |cols| (0..cols.len()).map(move |i| cols.get(i, team, season, false)))
    }

    /// Filtered pass over the stored plays. The returned iterator is finite,
    /// restartable (call again with the same filter) and costs time
    /// proportional to the matching rows. Iteration order is stable for a
    /// given store but otherwise unspecified.
    pub fn plays_where(
        &self,
        pos_team: Option<TeamId>,
        def_team: Option<TeamId>,
        season: Option<u16>,
    ) -> impl Iterator<Item = PlayRef> + '_ {
        let groups: Vec<(TeamId, u16, &PlayColumns, bool)> = if let Some(team) = pos_team {
            self.offense
                .iter()
                .filter(|((t, s), _)| *t == team && season.map_or(true, |want| *s == want))
                .map(|((t, s), cols)| (*t, *s, cols, true))
                .collect()
        } else if let Some(team) = def_team {
            self.defense
                .iter()
                .filter(|((t, s), _)| *t == team && season.map_or(true, |want| *s == want))
                .map(|((t, s), cols)| (*t, *s, cols, false))
                .collect()
        } else {
            self.offense
                .iter()
                .filter(|((_, s), _)| season.map_or(true, |want| *s == want))
                .map(|((t, s), cols)| (*t, *s, cols, true))
                .collect()
        };

        groups
            .into_iter()
            .flat_map(|(team, season, cols, offense)| {
                (0..cols.len()).map(move |i| cols.get(i, team, season, offense))
            })
            .filter(move |play| def_team.map_or(true, |want| play.def_team == want))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pos: &str, def: &str, season: u16, epa: f64) -> PlayRow {
        PlayRow {
            game_id: format!("{season}_01_{pos}_{def}"),
            season,
            week: 1,
            pos_team: TeamId::parse(pos).unwrap(),
            def_team: TeamId::parse(def).unwrap(),
            play_kind: PlayKind::Pass,
            down: Some(1),
            yards_to_go: Some(10),
            yardline_100: 75,
            yards_gained: 5,
            epa: Some(epa),
            success: epa > 0.0,
            interception: false,
            fumble_lost: false,
            air_yards: None,
            yards_after_catch: None,
            qb_epa: None,
            quarter_seconds_remaining: Some(600),
            game_seconds_remaining: Some(2400),
        }
    }

    #[test]
    fn groups_by_both_sides() {
        let store = PlayStore::from_rows(vec![
            row("BUF", "MIA", 2025, 0.4),
            row("BUF", "MIA", 2025, -0.1),
            row("MIA", "BUF", 2025, 0.2),
            row("BUF", "NYJ", 2024, 0.1),
        ]);
        let buf = TeamId::parse("BUF").unwrap();
        let mia = TeamId::parse("MIA").unwrap();

        assert_eq!(store.len(), 4);
        assert_eq!(store.season_count(), 2);
        assert_eq!(store.offense_count(buf, 2025), 2);
        assert_eq!(store.team_play_count(buf), 3);
        assert_eq!(store.defense_rows(buf, 2025).count(), 1);
        assert_eq!(store.defense_rows(mia, 2025).count(), 2);
    }

    #[test]
    fn plays_where_is_restartable_and_filtered() {
        let store = PlayStore::from_rows(vec![
            row("BUF", "MIA", 2025, 0.4),
            row("BUF", "NYJ", 2025, 0.3),
            row("MIA", "BUF", 2025, 0.2),
        ]);
        let buf = TeamId::parse("BUF").unwrap();
        let mia = TeamId::parse("MIA").unwrap();

        let first: Vec<_> = store.plays_where(Some(buf), None, Some(2025)).collect();
        let second: Vec<_> = store.plays_where(Some(buf), None, Some(2025)).collect();
        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);

        assert_eq!(store.plays_where(Some(buf), Some(mia), None).count(), 1);
        assert_eq!(store.plays_where(None, Some(buf), None).count(), 1);
        assert_eq!(store.plays_where(None, None, Some(2025)).count(), 3);
    }
}
