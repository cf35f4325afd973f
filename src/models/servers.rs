//! Server preference model.

use serde::{Deserialize, Serialize};

/// Activity of one player on one server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerActivity {
    pub server: String,
    pub total_records: u32,
    pub unique_tracks: u32,
    /// Records beyond the first attempt on each track
    pub improvements: u32,
    pub days_active: u32,
}

/// Where a player likes to race.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerPreference {
    pub player_id: String,
    pub player_name: String,
    pub total_records: u32,
    pub total_unique_tracks: u32,
    pub total_improvements: u32,
    /// Distinct days with a record on any labelled server
    pub total_days: u32,
    /// Sorted by records, busiest first
    pub servers: Vec<ServerActivity>,
}

impl ServerPreference {
    pub fn top_server(&self) -> Option<&ServerActivity> {
        self.servers.first()
    }

    /// Share of records on the busiest server, in percent.
    pub fn top_server_share(&self) -> f64 {
        match self.top_server() {
            Some(top) if self.total_records > 0 => {
                top.total_records as f64 / self.total_records as f64 * 100.0
            }
            _ => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_server_share() {
        let pref = ServerPreference {
            player_id: "alice".into(),
            player_name: "Alice".into(),
            total_records: 8,
            total_unique_tracks: 5,
            total_improvements: 3,
            total_days: 4,
            servers: vec![
                ServerActivity {
                    server: "cavern".into(),
                    total_records: 6,
                    unique_tracks: 4,
                    improvements: 2,
                    days_active: 3,
                },
                ServerActivity {
                    server: "minilol".into(),
                    total_records: 2,
                    unique_tracks: 1,
                    improvements: 1,
                    days_active: 1,
                },
            ],
        };
        assert_eq!(pref.top_server().map(|s| s.server.as_str()), Some("cavern"));
        assert!((pref.top_server_share() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_no_servers() {
        let pref = ServerPreference {
            player_id: "bob".into(),
            player_name: "bob".into(),
            total_records: 0,
            total_unique_tracks: 0,
            total_improvements: 0,
            total_days: 0,
            servers: vec![],
        };
        assert!(pref.top_server().is_none());
        assert_eq!(pref.top_server_share(), 0.0);
    }
}
