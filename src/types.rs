use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Stable 2-3 character team abbreviation (`BUF`, `LAR`, ...).
///
/// Stored inline so it is `Copy` and cheap to key maps with. Strings only
/// appear at the crate boundary; everything internal passes `TeamId` by value.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId {
    code: [u8; 3],
    len: u8,
}

impl TeamId {
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.len() < 2 || trimmed.len() > 3 {
            return None;
        }
        let mut code = [0u8; 3];
        for (idx, ch) in trimmed.bytes().enumerate() {
            if !ch.is_ascii_alphanumeric() {
                return None;
            }
            code[idx] = ch.to_ascii_uppercase();
        }
        Some(Self {
            code,
            len: trimmed.len() as u8,
        })
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII bytes are ever stored.
        std::str::from_utf8(&self.code[..self.len as usize]).unwrap_or("??")
    }
}

impl fmt::Display for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for TeamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TeamId({})", self.as_str())
    }
}

impl FromStr for TeamId {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw).ok_or_else(|| format!("invalid team abbreviation: {raw:?}"))
    }
}

impl Serialize for TeamId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for TeamId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        TeamId::parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid team id {raw:?}")))
    }
}

/// Play classification. Only the first four kinds are scrimmage plays and
/// count toward component scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayKind {
    Pass,
    Run,
    QbKneel,
    QbSpike,
    Punt,
    FieldGoal,
    Kickoff,
    ExtraPoint,
    Other,
}

impl PlayKind {
    pub fn is_scrimmage(self) -> bool {
        matches!(
            self,
            PlayKind::Pass | PlayKind::Run | PlayKind::QbKneel | PlayKind::QbSpike
        )
    }

    pub fn code(self) -> &'static str {
        match self {
            PlayKind::Pass => "pass",
            PlayKind::Run => "run",
            PlayKind::QbKneel => "qb_kneel",
            PlayKind::QbSpike => "qb_spike",
            PlayKind::Punt => "punt",
            PlayKind::FieldGoal => "field_goal",
            PlayKind::Kickoff => "kickoff",
            PlayKind::ExtraPoint => "extra_point",
            PlayKind::Other => "other",
        }
    }

    pub fn from_code(code: &str) -> Self {
        match code.trim().to_ascii_lowercase().as_str() {
            "pass" => PlayKind::Pass,
            "run" | "rush" => PlayKind::Run,
            "qb_kneel" => PlayKind::QbKneel,
            "qb_spike" => PlayKind::QbSpike,
            "punt" => PlayKind::Punt,
            "field_goal" => PlayKind::FieldGoal,
            "kickoff" => PlayKind::Kickoff,
            "extra_point" => PlayKind::ExtraPoint,
            _ => PlayKind::Other,
        }
    }
}

/// Roster position, closed set. Unknown position strings stay at the
/// boundary as `None` and are handled by each consumer's fallback rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    Ot,
    Og,
    C,
    De,
    Dt,
    Lb,
    Cb,
    S,
    K,
    P,
    Ls,
}

/// Coarse grouping used by the injury engine's impact tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionFamily {
    Quarterback,
    Skill,
    OffensiveLine,
    Defense,
    Special,
}

impl Position {
    pub const ALL: [Position; 15] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::Ot,
        Position::Og,
        Position::C,
        Position::De,
        Position::Dt,
        Position::Lb,
        Position::Cb,
        Position::S,
        Position::K,
        Position::P,
        Position::Ls,
    ];

    pub fn family(self) -> PositionFamily {
        match self {
            Position::Qb => PositionFamily::Quarterback,
            Position::Rb | Position::Wr | Position::Te => PositionFamily::Skill,
            Position::Ot | Position::Og | Position::C => PositionFamily::OffensiveLine,
            Position::De | Position::Dt | Position::Lb | Position::Cb | Position::S => {
                PositionFamily::Defense
            }
            Position::K | Position::P | Position::Ls => PositionFamily::Special,
        }
    }

    /// Relative weight of the position when grade information feeds the EPA
    /// adjustment. QB dominates; specialists barely register.
    pub fn impact_weight(self) -> f64 {
        match self {
            Position::Qb => 1.00,
            Position::C => 0.15,
            Position::Ot => 0.12,
            Position::Og => 0.08,
            Position::Te => 0.06,
            Position::Wr | Position::Rb => 0.05,
            Position::De => 0.04,
            Position::Dt | Position::Lb | Position::Cb | Position::S => 0.03,
            Position::K | Position::P | Position::Ls => 0.01,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::Ot => "OT",
            Position::Og => "OG",
            Position::C => "C",
            Position::De => "DE",
            Position::Dt => "DT",
            Position::Lb => "LB",
            Position::Cb => "CB",
            Position::S => "S",
            Position::K => "K",
            Position::P => "P",
            Position::Ls => "LS",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "QB" => Some(Position::Qb),
            "RB" | "HB" | "FB" => Some(Position::Rb),
            "WR" => Some(Position::Wr),
            "TE" => Some(Position::Te),
            "OT" | "T" | "LT" | "RT" => Some(Position::Ot),
            "OG" | "G" | "LG" | "RG" => Some(Position::Og),
            "C" => Some(Position::C),
            "DE" | "EDGE" => Some(Position::De),
            "DT" | "NT" => Some(Position::Dt),
            "LB" | "ILB" | "OLB" | "MLB" => Some(Position::Lb),
            "CB" => Some(Position::Cb),
            "S" | "FS" | "SS" => Some(Position::S),
            "K" => Some(Position::K),
            "P" => Some(Position::P),
            "LS" => Some(Position::Ls),
            _ => None,
        }
    }
}

/// Injury report designation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InjuryStatus {
    Out,
    Doubtful,
    Questionable,
    Ir,
    Pup,
    Nfi,
}

impl InjuryStatus {
    /// Absence likelihood multiplier. QUESTIONABLE counts as healthy.
    pub fn multiplier(self) -> f64 {
        match self {
            InjuryStatus::Out | InjuryStatus::Ir => 1.0,
            InjuryStatus::Doubtful => 0.8,
            InjuryStatus::Pup | InjuryStatus::Nfi => 0.9,
            InjuryStatus::Questionable => 0.0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            InjuryStatus::Out => "OUT",
            InjuryStatus::Doubtful => "DOUBTFUL",
            InjuryStatus::Questionable => "QUESTIONABLE",
            InjuryStatus::Ir => "IR",
            InjuryStatus::Pup => "PUP",
            InjuryStatus::Nfi => "NFI",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "OUT" => Some(InjuryStatus::Out),
            "DOUBTFUL" => Some(InjuryStatus::Doubtful),
            "QUESTIONABLE" => Some(InjuryStatus::Questionable),
            "IR" => Some(InjuryStatus::Ir),
            "PUP" => Some(InjuryStatus::Pup),
            "NFI" => Some(InjuryStatus::Nfi),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precipitation {
    None,
    Rain,
    Snow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Venue {
    Outdoor,
    Dome,
}

/// Game-day environmental conditions. Callers omit the whole context when
/// conditions are unknown; the weather scorer then stays neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherContext {
    pub temperature_f: Option<f64>,
    pub wind_mph: Option<f64>,
    pub precipitation: Precipitation,
    pub venue: Venue,
}

impl WeatherContext {
    pub fn dome() -> Self {
        Self {
            temperature_f: None,
            wind_mph: None,
            precipitation: Precipitation::None,
            venue: Venue::Dome,
        }
    }

    pub fn outdoor(temperature_f: f64, wind_mph: f64, precipitation: Precipitation) -> Self {
        Self {
            temperature_f: Some(temperature_f),
            wind_mph: Some(wind_mph),
            precipitation,
            venue: Venue::Outdoor,
        }
    }
}

/// Cooperative cancellation flag checked between component scorers.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn team_id_parse_normalizes_case_and_rejects_junk() {
        assert_eq!(TeamId::parse("buf").unwrap().as_str(), "BUF");
        assert_eq!(TeamId::parse(" KC ").unwrap().as_str(), "KC");
        assert!(TeamId::parse("X").is_none());
        assert!(TeamId::parse("LONG").is_none());
        assert!(TeamId::parse("B F").is_none());
    }

    #[test]
    fn scrimmage_kinds() {
        assert!(PlayKind::Pass.is_scrimmage());
        assert!(PlayKind::QbSpike.is_scrimmage());
        assert!(!PlayKind::Punt.is_scrimmage());
        assert!(!PlayKind::Kickoff.is_scrimmage());
        assert_eq!(PlayKind::from_code("FIELD_GOAL"), PlayKind::FieldGoal);
        assert_eq!(PlayKind::from_code("lateral"), PlayKind::Other);
    }

    #[test]
    fn position_families_cover_all() {
        for pos in Position::ALL {
            let _ = pos.family();
            assert!(pos.impact_weight() > 0.0);
            assert_eq!(Position::from_code(pos.code()), Some(pos));
        }
        assert_eq!(Position::from_code("EDGE"), Some(Position::De));
        assert_eq!(Position::from_code("XX"), None);
    }

    #[test]
    fn questionable_counts_as_healthy() {
        assert_eq!(InjuryStatus::Questionable.multiplier(), 0.0);
        assert_eq!(InjuryStatus::Out.multiplier(), 1.0);
        assert_eq!(InjuryStatus::Doubtful.multiplier(), 0.8);
    }

    #[test]
    fn team_id_serde_round_trip() {
        let id = TeamId::parse("LAR").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"LAR\"");
        let back: TeamId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
