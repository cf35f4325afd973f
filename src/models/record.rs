//! Race record model.

use std::cmp::Ordering;
use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Rank used in place of a missing or non-numeric position when records are compared.
pub const UNRANKED_SENTINEL: u32 = 999;

/// A leaderboard position as reported by the record source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Rank {
    /// Numeric position, always >= 1.
    Position(u32),
    /// Present but not a usable position; the raw text is kept.
    Unranked(String),
    /// No rank at all.
    Missing,
}

impl Rank {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Rank::Missing;
        }
        if trimmed.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(position) = trimmed.parse::<u32>() {
                if position >= 1 {
                    return Rank::Position(position);
                }
            }
        }
        Rank::Unranked(trimmed.to_string())
    }

    /// Numeric position, if any.
    pub fn position(&self) -> Option<u32> {
        match self {
            Rank::Position(p) => Some(*p),
            _ => None,
        }
    }

    /// Position for comparisons; anything non-numeric sorts as the worst rank.
    pub fn coerced(&self) -> u32 {
        self.position().unwrap_or(UNRANKED_SENTINEL)
    }

    /// True for a numeric position within `1..=n`.
    pub fn is_within(&self, n: u32) -> bool {
        matches!(self.position(), Some(p) if p <= n)
    }
}

impl From<String> for Rank {
    fn from(raw: String) -> Self {
        Rank::parse(&raw)
    }
}

impl From<Rank> for String {
    fn from(rank: Rank) -> Self {
        rank.to_string()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Position(p) => write!(f, "{}", p),
            Rank::Unranked(raw) => f.write_str(raw),
            Rank::Missing => Ok(()),
        }
    }
}

/// A finishing time exactly as published, e.g. `1:02.45` or `48.31`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeValue(String);

impl TimeValue {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Duration in seconds. Empty or unparsable times are infinitely slow.
    pub fn seconds(&self) -> f64 {
        let raw = self.0.as_str();
        if raw.is_empty() {
            return f64::INFINITY;
        }

        let parsed = match raw.split_once(':') {
            Some((minutes, seconds)) => minutes
                .parse::<f64>()
                .ok()
                .zip(seconds.parse::<f64>().ok())
                .map(|(m, s)| m * 60.0 + s),
            None => raw.parse::<f64>().ok(),
        };

        match parsed {
            Some(secs) if secs.is_finite() && secs >= 0.0 => secs,
            _ => f64::INFINITY,
        }
    }
}

/// When a record was set. Some sources only publish the date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RecordTimestamp {
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

impl RecordTimestamp {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        for format in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(RecordTimestamp::DateTime(dt));
            }
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(RecordTimestamp::Date)
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            RecordTimestamp::Date(d) => *d,
            RecordTimestamp::DateTime(dt) => dt.date(),
        }
    }

    /// Instant used for ordering; date-only values sit at midnight.
    pub fn datetime(&self) -> NaiveDateTime {
        match self {
            RecordTimestamp::Date(d) => d.and_time(chrono::NaiveTime::default()),
            RecordTimestamp::DateTime(dt) => *dt,
        }
    }

    /// Hour of day, only known when the source published a time.
    pub fn hour(&self) -> Option<u32> {
        match self {
            RecordTimestamp::Date(_) => None,
            RecordTimestamp::DateTime(dt) => Some(dt.hour()),
        }
    }

    pub fn weekday(&self) -> Weekday {
        self.date().weekday()
    }

    pub fn is_weekend(&self) -> bool {
        matches!(self.weekday(), Weekday::Sat | Weekday::Sun)
    }
}

impl Ord for RecordTimestamp {
    fn cmp(&self, other: &Self) -> Ordering {
        self.datetime().cmp(&other.datetime()).then_with(|| {
            let rank = |t: &Self| matches!(t, RecordTimestamp::DateTime(_)) as u8;
            rank(self).cmp(&rank(other))
        })
    }
}

impl PartialOrd for RecordTimestamp {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for RecordTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordTimestamp::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            RecordTimestamp::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl TryFrom<String> for RecordTimestamp {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        RecordTimestamp::parse(&raw).ok_or_else(|| format!("invalid record timestamp: {}", raw))
    }
}

impl From<RecordTimestamp> for String {
    fn from(ts: RecordTimestamp) -> Self {
        ts.to_string()
    }
}

/// One race result for a player on a track.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Deterministic ID (player + track + timestamp)
    pub id: RecordId,

    /// Stable player identifier (login)
    pub player_id: String,

    /// Nickname shown at the time of the record
    #[serde(default)]
    pub display_name: String,

    /// Track (challenge) name
    pub track_id: String,

    /// Finishing time as published
    #[serde(default)]
    pub time_value: TimeValue,

    /// Position on the track leaderboard
    pub rank: Rank,

    /// When the record was set; `None` when the source value was unusable
    #[serde(default)]
    pub timestamp: Option<RecordTimestamp>,

    /// Game environment (e.g. "Stadium")
    #[serde(default)]
    pub environment: String,

    /// Game mode (e.g. "TA", "Rounds")
    #[serde(default)]
    pub mode: String,

    /// Server the record was driven on
    #[serde(default)]
    pub server_label: Option<String>,
}

impl Record {
    /// Create a record with no rank, time or timestamp yet.
    pub fn new(player_id: impl Into<String>, track_id: impl Into<String>) -> Self {
        let player_id = player_id.into();
        let track_id = track_id.into();
        let id = RecordId::for_record(&player_id, &track_id, "");
        Self {
            id,
            player_id,
            display_name: String::new(),
            track_id,
            time_value: TimeValue::default(),
            rank: Rank::Missing,
            timestamp: None,
            environment: String::new(),
            mode: String::new(),
            server_label: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }

    pub fn with_rank(mut self, rank: Rank) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_time(mut self, time: TimeValue) -> Self {
        self.time_value = time;
        self
    }

    /// Set the timestamp from its published text; the ID follows the raw text
    /// so unparsable timestamps still yield distinct records.
    pub fn with_timestamp_str(mut self, raw: &str) -> Self {
        self.timestamp = RecordTimestamp::parse(raw);
        let key = self
            .timestamp
            .map(|t| t.to_string())
            .unwrap_or_else(|| raw.trim().to_string());
        self.id = RecordId::for_record(&self.player_id, &self.track_id, &key);
        self
    }

    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }

    pub fn with_mode(mut self, mode: impl Into<String>) -> Self {
        self.mode = mode.into();
        self
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        let server = server.into();
        self.server_label = if server.trim().is_empty() {
            None
        } else {
            Some(server)
        };
        self
    }

    /// Calendar day of the record, if known.
    pub fn date(&self) -> Option<NaiveDate> {
        self.timestamp.map(|t| t.date())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_parse() {
        assert_eq!(Rank::parse("1"), Rank::Position(1));
        assert_eq!(Rank::parse(" 17 "), Rank::Position(17));
        assert_eq!(Rank::parse(""), Rank::Missing);
        assert_eq!(Rank::parse("--"), Rank::Unranked("--".to_string()));
        assert_eq!(Rank::parse("0"), Rank::Unranked("0".to_string()));
        assert_eq!(Rank::parse("-3"), Rank::Unranked("-3".to_string()));
    }

    #[test]
    fn test_rank_coercion() {
        assert_eq!(Rank::Position(4).coerced(), 4);
        assert_eq!(Rank::Unranked("n/a".into()).coerced(), UNRANKED_SENTINEL);
        assert_eq!(Rank::Missing.coerced(), UNRANKED_SENTINEL);
    }

    #[test]
    fn test_rank_within() {
        assert!(Rank::Position(3).is_within(3));
        assert!(!Rank::Position(4).is_within(3));
        assert!(!Rank::Unranked("x".into()).is_within(999));
    }

    #[test]
    fn test_rank_keeps_raw_text_through_serde() {
        let rank = Rank::parse("DNF");
        let json = serde_json::to_string(&rank).unwrap();
        assert_eq!(json, "\"DNF\"");
        let back: Rank = serde_json::from_str(&json).unwrap();
        assert_eq!(back, rank);
    }

    #[test]
    fn test_time_value_seconds() {
        assert_eq!(TimeValue::new("1:02.50").seconds(), 62.5);
        assert_eq!(TimeValue::new("48.31").seconds(), 48.31);
        assert_eq!(TimeValue::new("").seconds(), f64::INFINITY);
        assert_eq!(TimeValue::new("abc").seconds(), f64::INFINITY);
        assert_eq!(TimeValue::new("1:xx").seconds(), f64::INFINITY);
    }

    #[test]
    fn test_timestamp_parse() {
        let dt = RecordTimestamp::parse("2025-06-14 23:15:00").unwrap();
        assert_eq!(dt.hour(), Some(23));
        assert!(dt.is_weekend());

        let d = RecordTimestamp::parse("2025-06-16").unwrap();
        assert_eq!(d.hour(), None);
        assert_eq!(d.weekday(), Weekday::Mon);

        assert!(RecordTimestamp::parse("yesterday").is_none());
    }

    #[test]
    fn test_timestamp_ordering() {
        let date = RecordTimestamp::parse("2025-06-14").unwrap();
        let morning = RecordTimestamp::parse("2025-06-14 08:00:00").unwrap();
        let midnight = RecordTimestamp::parse("2025-06-14 00:00:00").unwrap();
        assert!(date < morning);
        assert!(date < midnight);
        assert_ne!(date, midnight);
    }

    #[test]
    fn test_record_builder() {
        let record = Record::new("alice", "A01-Race")
            .with_display_name("$f00Alice")
            .with_rank(Rank::Position(2))
            .with_time(TimeValue::new("0:45.12"))
            .with_timestamp_str("2025-06-15 12:00:00")
            .with_server("");

        assert_eq!(record.rank.position(), Some(2));
        assert_eq!(record.server_label, None);
        assert_eq!(record.date(), NaiveDate::from_ymd_opt(2025, 6, 15));
        assert_eq!(
            record.id,
            RecordId::for_record("alice", "A01-Race", "2025-06-15 12:00:00")
        );
    }

    #[test]
    fn test_record_serialization() {
        let record = Record::new("bob", "Lolsport 3")
            .with_rank(Rank::parse("12"))
            .with_timestamp_str("2025-06-15");
        let json = serde_json::to_string(&record).unwrap();
        let back: Record = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
