//! Statistics calculation engine.
//!
//! Turns raw record rows into a weekly leaderboard and friends:
//! - Normalization of raw rows into `Record`s
//! - Best-attempt deduplication per player and track
//! - Competition-weighted scoring and leaderboard ranking with trends
//! - Head-to-head rivalry detection
//! - Achievement analyzers, server preferences and weekly totals
//!
//! Nothing here does I/O or returns errors. Malformed fields degrade to
//! sentinel values (rank 999, infinite time) and empty input gives empty output.

pub mod achievements;
mod dedup;
mod nicknames;
mod normalize;
mod pulse;
mod ranking;
mod rivalry;
mod scoring;
mod servers;
pub(crate) mod tally;
mod weekly;
mod weighting;
mod window;

pub use achievements::{featured_tracks, run_all, AchievementOptions, AnalyzerContext};
pub use dedup::*;
pub use nicknames::*;
pub use normalize::*;
pub use pulse::*;
pub use ranking::*;
pub use rivalry::*;
pub use scoring::*;
pub use servers::*;
pub use weekly::*;
pub use weighting::*;
pub use window::*;
