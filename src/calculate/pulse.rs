//! Team-wide totals.

use std::collections::HashSet;

use crate::calculate::tally::Tally;
use crate::calculate::DeduplicatedRecordSet;
use crate::models::{Record, TrackPopularity, WeeklyPulse};

/// Summarize a window: attempts, unique records, tracks, players and the busiest track.
///
/// The busiest track has the most deduplicated records; the first seen wins a tie.
pub fn weekly_pulse(raw: &[Record], dedup: &DeduplicatedRecordSet) -> WeeklyPulse {
    let players: HashSet<&str> = dedup.iter().map(|r| r.player_id.as_str()).collect();
    let tracks: Tally = dedup.iter().map(|r| r.track_id.as_str()).collect();

    WeeklyPulse {
        raw_records: raw.len() as u32,
        unique_records: dedup.len() as u32,
        tracks: tracks.iter().count() as u32,
        players: players.len() as u32,
        hottest_track: tracks.leader().map(|(track_id, records)| TrackPopularity {
            track_id: track_id.to_string(),
            records,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculate::deduplicate;
    use crate::models::Rank;
    use pretty_assertions::assert_eq;

    fn rec(player: &str, track: &str, rank: u32) -> Record {
        Record::new(player, track).with_rank(Rank::Position(rank))
    }

    #[test]
    fn test_pulse() {
        let raw = vec![
            rec("alice", "A", 3),
            rec("alice", "A", 1),
            rec("bob", "B", 2),
            rec("bob", "A", 2),
            rec("carol", "B", 4),
        ];
        let dedup = deduplicate(&raw);
        let pulse = weekly_pulse(&raw, &dedup);

        assert_eq!(
            pulse,
            WeeklyPulse {
                raw_records: 5,
                unique_records: 4,
                tracks: 2,
                players: 3,
                hottest_track: Some(TrackPopularity {
                    track_id: "A".to_string(),
                    records: 2,
                }),
            }
        );
    }

    #[test]
    fn test_empty_pulse() {
        let pulse = weekly_pulse(&[], &DeduplicatedRecordSet::new());
        assert_eq!(pulse, WeeklyPulse::default());
    }
}
