//! Points and per-player summaries.

use crate::calculate::competition_multiplier;
use crate::models::{ChallengeCompetitionInfo, PlayerWeekSummary, Rank, Record};

/// Points a single rank is worth before weighting.
pub fn base_points(rank: &Rank) -> u32 {
    match rank {
        Rank::Position(1) => 5,
        Rank::Position(2..=3) => 3,
        Rank::Position(4..=5) => 2,
        Rank::Position(_) | Rank::Unranked(_) => 1,
        Rank::Missing => 0,
    }
}

/// Weighted points for one record.
pub fn record_points(record: &Record, info: &ChallengeCompetitionInfo) -> f64 {
    base_points(&record.rank) as f64 * competition_multiplier(info.participants(&record.track_id))
}

/// Round half away from zero to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Total weighted points of a record set, rounded to one decimal.
///
/// Meant for one player's deduplicated records over a window.
pub fn score<'a, I>(records: I, info: &ChallengeCompetitionInfo) -> f64
where
    I: IntoIterator<Item = &'a Record>,
{
    let total: f64 = records.into_iter().map(|r| record_points(r, info)).sum();
    round1(total)
}

/// Aggregate one player's deduplicated records.
pub fn summarize_player<'a, I>(
    player_id: &str,
    display_name: &str,
    records: I,
    info: &ChallengeCompetitionInfo,
) -> PlayerWeekSummary
where
    I: IntoIterator<Item = &'a Record>,
{
    let records: Vec<&Record> = records.into_iter().collect();

    let count_within = |n: u32| records.iter().filter(|r| r.rank.is_within(n)).count() as u32;
    let positions: Vec<u32> = records.iter().filter_map(|r| r.rank.position()).collect();
    let average_rank = if positions.is_empty() {
        None
    } else {
        Some(positions.iter().map(|&p| p as f64).sum::<f64>() / positions.len() as f64)
    };

    PlayerWeekSummary {
        player_id: player_id.to_string(),
        display_name: display_name.to_string(),
        rank_1: count_within(1),
        top_3: count_within(3),
        top_5: count_within(5),
        total_records: records.len() as u32,
        average_rank,
        points: score(records.iter().copied(), info),
    }
}
