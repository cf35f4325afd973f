//! Derived statistics models.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Inclusive date range a report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl ReportWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Seven days ending on `to`.
    pub fn week_ending(to: NaiveDate) -> Self {
        Self {
            from: to - Duration::days(6),
            to,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }

    /// The seven days immediately before this window.
    pub fn previous(&self) -> Self {
        let to = self.from - Duration::days(1);
        Self {
            from: self.from - Duration::days(7),
            to,
        }
    }

    pub fn days(&self) -> i64 {
        (self.to - self.from).num_days() + 1
    }
}

/// One player's aggregate over a report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerWeekSummary {
    /// Player login
    pub player_id: String,

    /// Latest nickname in the window
    pub display_name: String,

    /// Rank 1 finishes
    pub rank_1: u32,

    /// Top 3 finishes
    pub top_3: u32,

    /// Top 5 finishes
    pub top_5: u32,

    /// Records counted (one per track after deduplication)
    pub total_records: u32,

    /// Mean of numeric ranks; `None` when no rank was numeric
    pub average_rank: Option<f64>,

    /// Competition-weighted points, one decimal
    pub points: f64,
}

/// Movement on the leaderboard relative to the previous window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "direction", content = "places", rename_all = "snake_case")]
pub enum Trend {
    Up(usize),
    Down(usize),
    Unchanged,
    New,
}

impl Trend {
    /// Compare 1-based positions; a smaller position is better.
    pub fn between(previous: Option<usize>, current: usize) -> Self {
        match previous {
            None => Trend::New,
            Some(prev) if prev > current => Trend::Up(prev - current),
            Some(prev) if prev < current => Trend::Down(current - prev),
            Some(_) => Trend::Unchanged,
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trend::Up(n) => write!(f, "▲({})", n),
            Trend::Down(n) => write!(f, "▼({})", n),
            Trend::Unchanged => write!(f, "■"),
            Trend::New => write!(f, "NEW"),
        }
    }
}

/// A leaderboard row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    /// 1-based position
    pub position: usize,
    pub summary: PlayerWeekSummary,
    pub trend: Trend,
}

/// Busiest track of the window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackPopularity {
    pub track_id: String,
    pub records: u32,
}

/// Team-wide totals for a window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyPulse {
    /// Records before deduplication
    pub raw_records: u32,

    /// Unique player/track records
    pub unique_records: u32,

    /// Distinct tracks with at least one record
    pub tracks: u32,

    /// Distinct players with at least one record
    pub players: u32,

    /// Track with the most unique records
    pub hottest_track: Option<TrackPopularity>,
}
