//! Server preference analysis over raw attempts.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use tracing::debug;

use crate::calculate::NicknameBook;
use crate::models::{Record, ServerActivity, ServerPreference};

#[derive(Default)]
struct ServerTally<'a> {
    total: u32,
    tracks: HashSet<&'a str>,
    days: HashSet<NaiveDate>,
}

#[derive(Default)]
struct PlayerTally<'a> {
    servers: Vec<(&'a str, ServerTally<'a>)>,
    days: HashSet<NaiveDate>,
}

/// Where each player races, busiest players first.
///
/// Only attempts with a server label count. A server needs at least
/// `min_records` attempts from a player to be listed for them; players left
/// with no listed server are dropped. `total_days` counts distinct days on
/// any labelled server, listed or not.
pub fn server_preferences<'a, I>(
    records: I,
    names: &NicknameBook,
    min_records: u32,
) -> Vec<ServerPreference>
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut order: Vec<&str> = Vec::new();
    let mut players: HashMap<&str, PlayerTally> = HashMap::new();

    for record in records {
        let Some(server) = record.server_label.as_deref() else {
            continue;
        };
        let player = record.player_id.as_str();
        let tally = players.entry(player).or_insert_with(|| {
            order.push(player);
            PlayerTally::default()
        });

        let slot = match tally.servers.iter().position(|(s, _)| *s == server) {
            Some(i) => i,
            None => {
                tally.servers.push((server, ServerTally::default()));
                tally.servers.len() - 1
            }
        };
        let entry = &mut tally.servers[slot].1;
        entry.total += 1;
        entry.tracks.insert(record.track_id.as_str());
        if let Some(date) = record.date() {
            entry.days.insert(date);
            tally.days.insert(date);
        }
    }

    let mut preferences: Vec<ServerPreference> = order
        .into_iter()
        .filter_map(|player| {
            let tally = players.remove(player)?;
            build_preference(player, tally, names, min_records)
        })
        .collect();

    preferences.sort_by(|a, b| (b.total_records + b.total_days).cmp(&(a.total_records + a.total_days)));
    debug!(players = preferences.len(), min_records, "Analyzed server preferences");
    preferences
}

fn build_preference(
    player: &str,
    tally: PlayerTally<'_>,
    names: &NicknameBook,
    min_records: u32,
) -> Option<ServerPreference> {
    let mut servers: Vec<ServerActivity> = tally
        .servers
        .into_iter()
        .filter(|(_, s)| s.total >= min_records)
        .map(|(server, s)| {
            let unique_tracks = s.tracks.len() as u32;
            ServerActivity {
                server: server.to_string(),
                total_records: s.total,
                unique_tracks,
                improvements: s.total - unique_tracks,
                days_active: s.days.len() as u32,
            }
        })
        .collect();
    if servers.is_empty() {
        return None;
    }
    servers.sort_by(|a, b| b.total_records.cmp(&a.total_records));

    Some(ServerPreference {
        player_id: player.to_string(),
        player_name: names.name(player).to_string(),
        total_records: servers.iter().map(|s| s.total_records).sum(),
        total_unique_tracks: servers.iter().map(|s| s.unique_tracks).sum(),
        total_improvements: servers.iter().map(|s| s.improvements).sum(),
        total_days: tally.days.len() as u32,
        servers,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rank;
    use pretty_assertions::assert_eq;

    fn rec(player: &str, track: &str, server: &str, ts: &str) -> Record {
        Record::new(player, track)
            .with_rank(Rank::Position(1))
            .with_server(server)
            .with_timestamp_str(ts)
    }

    #[test]
    fn test_server_breakdown() {
        let records = vec![
            rec("alice", "A", "Cavern", "2025-06-10 10:00:00"),
            rec("alice", "A", "Cavern", "2025-06-10 11:00:00"),
            rec("alice", "B", "Cavern", "2025-06-11 10:00:00"),
            rec("alice", "C", "MiniLOL", "2025-06-12 10:00:00"),
            rec("alice", "D", "", "2025-06-13 10:00:00"),
        ];
        let prefs = server_preferences(&records, &NicknameBook::new(), 1);

        assert_eq!(prefs.len(), 1);
        let alice = &prefs[0];
        assert_eq!(alice.total_records, 4);
        assert_eq!(alice.total_unique_tracks, 3);
        assert_eq!(alice.total_improvements, 1);
        assert_eq!(alice.total_days, 3);
        assert_eq!(
            alice.servers[0],
            ServerActivity {
                server: "Cavern".to_string(),
                total_records: 3,
                unique_tracks: 2,
                improvements: 1,
                days_active: 2,
            }
        );
        assert_eq!(alice.servers[1].server, "MiniLOL");
    }

    #[test]
    fn test_min_records_filters_servers_and_players() {
        let records = vec![
            rec("alice", "A", "Cavern", "2025-06-10"),
            rec("alice", "B", "Cavern", "2025-06-11"),
            rec("alice", "C", "MiniLOL", "2025-06-12"),
            rec("bob", "A", "Cavern", "2025-06-10"),
        ];
        let prefs = server_preferences(&records, &NicknameBook::new(), 2);

        assert_eq!(prefs.len(), 1);
        assert_eq!(prefs[0].servers.len(), 1);
        assert_eq!(prefs[0].total_records, 2);
        // days still counted across every labelled server
        assert_eq!(prefs[0].total_days, 3);
    }

    #[test]
    fn test_sorted_by_activity() {
        let records = vec![
            rec("alice", "A", "Cavern", "2025-06-10"),
            rec("bob", "A", "Cavern", "2025-06-10"),
            rec("bob", "B", "Cavern", "2025-06-11"),
        ];
        let prefs = server_preferences(&records, &NicknameBook::new(), 1);
        let order: Vec<&str> = prefs.iter().map(|p| p.player_id.as_str()).collect();
        assert_eq!(order, vec!["bob", "alice"]);
    }

    #[test]
    fn test_no_labels() {
        let records = vec![rec("alice", "A", "", "2025-06-10")];
        assert!(server_preferences(&records, &NicknameBook::new(), 1).is_empty());
    }
}
