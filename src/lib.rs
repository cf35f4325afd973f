//! # Dedi Stats
//!
//! Weekly leaderboard, rivalry and achievement stats for a team of
//! Dedimania racers.
//!
//! ## Architecture
//!
//! - **models**: Core data structures (records, ranks, summaries, awards)
//! - **ingest**: CSV/TSV import of raw record rows
//! - **storage**: Filesystem data lake operations (JSONL)
//! - **calculate**: Deduplication, scoring, rivalries and achievements
//! - **report**: Text and CSV rendering
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod ingest;
pub mod models;
pub mod report;
pub mod storage;

pub use models::*;

use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` date, ignoring surrounding whitespace.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}
