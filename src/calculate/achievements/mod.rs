//! Weekly superlatives.
//!
//! Each analyzer is a plain function over an [`AnalyzerContext`] returning
//! `Option<AchievementResult>`. Some read the raw attempt stream (repeats
//! count), the rest read the deduplicated set; each function says which.
//! An analyzer returns `None` rather than crowning someone with a zero.
//!
//! Ties on "most" go to the player seen first in the input.

mod activity;
mod performance;
mod volume;

pub use activity::*;
pub use performance::*;
pub use volume::*;

use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use crate::calculate::{DeduplicatedRecordSet, NicknameBook};
use crate::calculate::tally::Tally;
use crate::models::{AchievementKind, AchievementResult, ChallengeCompetitionInfo, Record};

/// Tunables for the analyzers.
#[derive(Debug, Clone)]
pub struct AchievementOptions {
    /// First hour counted as night, inclusive
    pub night_start_hour: u32,
    /// Last hour counted as night, inclusive
    pub night_end_hour: u32,
    /// Track-name keyword for the keyword award, matched case-insensitively
    pub keyword: String,
    /// Server labels that count as the featured server; `None` disables the award
    pub featured_server: Option<Regex>,
    pub featured_server_title: String,
}

impl Default for AchievementOptions {
    fn default() -> Self {
        Self {
            night_start_hour: 0,
            night_end_hour: 6,
            keyword: "lolsport".to_string(),
            featured_server: Regex::new(DEFAULT_FEATURED_SERVER_PATTERN).ok(),
            featured_server_title: "MINILOL CHAMPION".to_string(),
        }
    }
}

pub(crate) const DEFAULT_FEATURED_SERVER_PATTERN: &str = r"(?i)mini\s*lol[ _.]*free\s*zone";

impl AchievementOptions {
    pub fn keyword_title(&self) -> String {
        format!("{} ADDICT", self.keyword.trim().to_uppercase())
    }
}

/// Everything an analyzer may look at.
#[derive(Debug, Clone, Copy)]
pub struct AnalyzerContext<'a> {
    /// Every attempt in the window
    pub raw: &'a [Record],
    /// Best attempt per player and track
    pub dedup: &'a DeduplicatedRecordSet,
    pub info: &'a ChallengeCompetitionInfo,
    pub names: &'a NicknameBook,
    pub options: &'a AchievementOptions,
    /// Tracks ever listed on the featured server, from every stored record
    pub featured_tracks: &'a HashSet<String>,
}

impl<'a> AnalyzerContext<'a> {
    pub(crate) fn award(&self, kind: AchievementKind, player_id: &str, value: u32) -> AchievementResult {
        AchievementResult::new(kind, player_id, self.names.name(player_id), value)
    }
}

/// Run every analyzer, in catalogue order, keeping those that produced a winner.
pub fn run_all(ctx: &AnalyzerContext<'_>) -> Vec<AchievementResult> {
    let analyzers: [fn(&AnalyzerContext<'_>) -> Option<AchievementResult>; 16] = [
        night_owl,
        saturday_night_fever,
        just_one_more,
        creature_of_habit,
        caffeine_addict,
        solo_explorer,
        lucky_number,
        first_loser,
        third_times_the_charm,
        track_king,
        no_lifer,
        track_hunter,
        keyword_addict,
        server_champion,
        benchwarmer,
        rage_quit,
    ];

    let results: Vec<AchievementResult> = analyzers.iter().filter_map(|analyze| analyze(ctx)).collect();
    debug!(awarded = results.len(), "Ran achievement analyzers");
    results
}
