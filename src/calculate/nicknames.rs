//! Display name lookup.

use std::collections::HashMap;

use crate::models::{Record, RecordTimestamp};

/// Latest non-empty nickname per player.
///
/// Built once from the records at hand and passed to whatever needs names,
/// so lookups never depend on call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NicknameBook {
    names: HashMap<String, (Option<RecordTimestamp>, String)>,
}

impl NicknameBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record's nickname. Newer timestamps win; on equal timestamps
    /// the later offer wins. Records without a timestamp are oldest.
    pub fn observe(&mut self, record: &Record) {
        let name = record.display_name.trim();
        if name.is_empty() {
            return;
        }
        match self.names.get_mut(&record.player_id) {
            Some((seen, current)) => {
                if record.timestamp >= *seen {
                    *seen = record.timestamp;
                    *current = name.to_string();
                }
            }
            None => {
                self.names.insert(
                    record.player_id.clone(),
                    (record.timestamp, name.to_string()),
                );
            }
        }
    }

    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let mut book = Self::new();
        for record in records {
            book.observe(record);
        }
        book
    }

    /// Nickname for a player, falling back to the player id.
    pub fn name<'a>(&'a self, player_id: &'a str) -> &'a str {
        self.names
            .get(player_id)
            .map(|(_, name)| name.as_str())
            .unwrap_or(player_id)
    }

    pub fn get(&self, player_id: &str) -> Option<&str> {
        self.names.get(player_id).map(|(_, name)| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(player: &str, name: &str, ts: &str) -> Record {
        Record::new(player, "T")
            .with_display_name(name)
            .with_timestamp_str(ts)
    }

    #[test]
    fn test_latest_name_wins() {
        let book = NicknameBook::from_records(&[
            rec("alice", "Old", "2025-06-10 10:00:00"),
            rec("alice", "Newest", "2025-06-14 09:00:00"),
            rec("alice", "Middle", "2025-06-12"),
        ]);
        assert_eq!(book.name("alice"), "Newest");
    }

    #[test]
    fn test_empty_names_are_skipped() {
        let book = NicknameBook::from_records(&[
            rec("bob", "Bobby", "2025-06-10"),
            rec("bob", "  ", "2025-06-15"),
        ]);
        assert_eq!(book.name("bob"), "Bobby");
    }

    #[test]
    fn test_fallback_to_id() {
        let book = NicknameBook::new();
        assert_eq!(book.name("carol"), "carol");
        assert_eq!(book.get("carol"), None);
    }

    #[test]
    fn test_missing_timestamp_is_oldest() {
        let book = NicknameBook::from_records(&[
            rec("dan", "Dated", "2025-06-01"),
            rec("dan", "Undated", "garbage"),
        ]);
        assert_eq!(book.name("dan"), "Dated");
    }
}
