//! Head-to-head rivalry model.

use serde::{Deserialize, Serialize};

/// Two players who keep meeting on the same tracks.
///
/// The leader is listed first. For a tied pair, the names are in
/// alphabetical order and `tied` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RivalryRecord {
    pub leader_id: String,
    pub leader_name: String,
    pub loser_id: String,
    pub loser_name: String,

    /// Distinct tracks both players have a record on
    pub shared_tracks: u32,

    /// Tracks the leader ranks better on
    pub leader_wins: u32,

    /// Tracks the loser ranks better on
    pub loser_wins: u32,

    pub tied: bool,

    /// Shared track names, sorted
    pub tracks: Vec<String>,
}

impl RivalryRecord {
    /// Head-to-head score, leader side first: `"2-1"`.
    pub fn score(&self) -> String {
        format!("{}-{}", self.leader_wins, self.loser_wins)
    }

    /// Name of the player ahead, `None` for a tie.
    pub fn leader(&self) -> Option<&str> {
        if self.tied {
            None
        } else {
            Some(&self.leader_name)
        }
    }

    /// Whether this rivalry is between the two given players, in either order.
    pub fn involves(&self, a: &str, b: &str) -> bool {
        (self.leader_id == a && self.loser_id == b) || (self.leader_id == b && self.loser_id == a)
    }
}
