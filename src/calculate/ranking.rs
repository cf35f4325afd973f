//! Leaderboard ordering and trends.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::models::{PlayerWeekSummary, RankedEntry, Trend};

/// 1-based positions of players in an earlier leaderboard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreviousRanking {
    positions: HashMap<String, usize>,
}

impl PreviousRanking {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank the earlier window's summaries with the same ordering as the current one.
    pub fn from_summaries(summaries: Vec<PlayerWeekSummary>) -> Self {
        let positions = sort_summaries(summaries)
            .into_iter()
            .enumerate()
            .map(|(i, s)| (s.player_id, i + 1))
            .collect();
        Self { positions }
    }

    pub fn position(&self, player_id: &str) -> Option<usize> {
        self.positions.get(player_id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(String, usize)> for PreviousRanking {
    fn from_iter<I: IntoIterator<Item = (String, usize)>>(iter: I) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// Descending by points, then rank-1, top-3 and top-5 counts.
pub fn compare_summaries(a: &PlayerWeekSummary, b: &PlayerWeekSummary) -> Ordering {
    b.points
        .total_cmp(&a.points)
        .then_with(|| b.rank_1.cmp(&a.rank_1))
        .then_with(|| b.top_3.cmp(&a.top_3))
        .then_with(|| b.top_5.cmp(&a.top_5))
}

/// Stable sort; equal keys stay in input order.
pub fn sort_summaries(mut summaries: Vec<PlayerWeekSummary>) -> Vec<PlayerWeekSummary> {
    summaries.sort_by(compare_summaries);
    summaries
}

/// Order the current window and attach each player's movement since `previous`.
pub fn rank_leaderboard(
    summaries: Vec<PlayerWeekSummary>,
    previous: &PreviousRanking,
) -> Vec<RankedEntry> {
    sort_summaries(summaries)
        .into_iter()
        .enumerate()
        .map(|(i, summary)| {
            let position = i + 1;
            let trend = Trend::between(previous.position(&summary.player_id), position);
            RankedEntry {
                position,
                summary,
                trend,
            }
        })
        .collect()
}
