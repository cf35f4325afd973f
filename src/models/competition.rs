//! Track competition levels.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Participant count for one track, as stored in `challenge_info.jsonl`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeInfo {
    /// Track (challenge) name
    pub challenge_name: String,

    /// Distinct players that ever posted a record on the track
    pub total_records: i64,
}

/// Read-only lookup from track to total participants.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChallengeCompetitionInfo {
    participants: HashMap<String, i64>,
}

impl ChallengeCompetitionInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the participant count for a track, replacing any earlier value.
    pub fn insert(&mut self, track_id: impl Into<String>, total_participants: i64) {
        self.participants.insert(track_id.into(), total_participants);
    }

    /// Total participants for a track; `None` when the track is unknown.
    pub fn participants(&self, track_id: &str) -> Option<i64> {
        self.participants.get(track_id).copied()
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }
}

impl FromIterator<ChallengeInfo> for ChallengeCompetitionInfo {
    fn from_iter<I: IntoIterator<Item = ChallengeInfo>>(iter: I) -> Self {
        let mut info = Self::new();
        for row in iter {
            info.insert(row.challenge_name, row.total_records);
        }
        info
    }
}

impl<S: Into<String>> FromIterator<(S, i64)> for ChallengeCompetitionInfo {
    fn from_iter<I: IntoIterator<Item = (S, i64)>>(iter: I) -> Self {
        let mut info = Self::new();
        for (track, total) in iter {
            info.insert(track, total);
        }
        info
    }
}
