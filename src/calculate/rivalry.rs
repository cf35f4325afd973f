//! Head-to-head rivalry detection.
//!
//! Every pair of players meeting on a track is compared by best rank on that
//! track. A pair becomes a rivalry once it shares enough distinct tracks,
//! whoever won them.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use tracing::debug;

use crate::calculate::{DeduplicatedRecordSet, NicknameBook};
use crate::models::RivalryRecord;

/// Knobs for [`detect_rivalries`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RivalryOptions {
    /// Shared tracks needed before a pair counts as a rivalry
    pub min_shared_tracks: u32,
    /// Players never paired with anyone
    pub excluded_players: HashSet<String>,
}

impl Default for RivalryOptions {
    fn default() -> Self {
        Self {
            min_shared_tracks: 3,
            excluded_players: HashSet::new(),
        }
    }
}

impl RivalryOptions {
    pub fn with_min_shared_tracks(mut self, min: u32) -> Self {
        self.min_shared_tracks = min;
        self
    }

    pub fn with_excluded<I, S>(mut self, players: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_players.extend(players.into_iter().map(Into::into));
        self
    }
}

/// Running head-to-head tally for a pair, keyed with the smaller id first.
#[derive(Debug, Default)]
struct PairTally {
    first_wins: u32,
    second_wins: u32,
    tracks: BTreeSet<String>,
}

/// Find rivalries in a deduplicated record set, most shared tracks first.
///
/// Non-numeric ranks compare as 999. Equal ranks award no win. Each pair is
/// reported once.
pub fn detect_rivalries(
    records: &DeduplicatedRecordSet,
    names: &NicknameBook,
    options: &RivalryOptions,
) -> Vec<RivalryRecord> {
    // track -> [(player, rank)], players in first-seen order
    let mut by_track: BTreeMap<&str, Vec<(&str, u32)>> = BTreeMap::new();
    for record in records.iter() {
        if options.excluded_players.contains(&record.player_id) {
            continue;
        }
        by_track
            .entry(record.track_id.as_str())
            .or_default()
            .push((record.player_id.as_str(), record.rank.coerced()));
    }

    let mut pairs: BTreeMap<(&str, &str), PairTally> = BTreeMap::new();
    for (track, entries) in &by_track {
        for (i, &(p1, r1)) in entries.iter().enumerate() {
            for &(p2, r2) in &entries[i + 1..] {
                if p1 == p2 {
                    continue;
                }
                let (a, ra, b, rb) = if p1 < p2 { (p1, r1, p2, r2) } else { (p2, r2, p1, r1) };
                let tally = pairs.entry((a, b)).or_default();
                tally.tracks.insert(track.to_string());
                if ra < rb {
                    tally.first_wins += 1;
                } else if rb < ra {
                    tally.second_wins += 1;
                }
            }
        }
    }

    let mut rivalries: Vec<RivalryRecord> = pairs
        .into_iter()
        .filter(|(_, tally)| tally.tracks.len() as u32 >= options.min_shared_tracks)
        .map(|((a, b), tally)| build_record(a, b, tally, names))
        .collect();

    rivalries.sort_by(|x, y| y.shared_tracks.cmp(&x.shared_tracks));
    debug!(
        tracks = by_track.len(),
        rivalries = rivalries.len(),
        "Detected rivalries"
    );
    rivalries
}

fn build_record(a: &str, b: &str, tally: PairTally, names: &NicknameBook) -> RivalryRecord {
    let shared_tracks = tally.tracks.len() as u32;
    let tracks: Vec<String> = tally.tracks.into_iter().collect();

    let (leader, leader_wins, loser, loser_wins, tied) = if tally.first_wins > tally.second_wins {
        (a, tally.first_wins, b, tally.second_wins, false)
    } else if tally.second_wins > tally.first_wins {
        (b, tally.second_wins, a, tally.first_wins, false)
    } else {
        // displayed names in plain string order, so uppercase sorts first
        let (na, nb) = (names.name(a), names.name(b));
        if na <= nb {
            (a, tally.first_wins, b, tally.second_wins, true)
        } else {
            (b, tally.second_wins, a, tally.first_wins, true)
        }
    };

    RivalryRecord {
        leader_id: leader.to_string(),
        leader_name: names.name(leader).to_string(),
        loser_id: loser.to_string(),
        loser_name: names.name(loser).to_string(),
        shared_tracks,
        leader_wins,
        loser_wins,
        tied,
        tracks,
    }
}
