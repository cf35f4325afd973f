//! Best-attempt deduplication.

use std::collections::HashMap;

use tracing::debug;

use crate::models::Record;

/// At most one record per (player, track): the best-ranked attempt.
///
/// Records keep the order in which their (player, track) pair was first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeduplicatedRecordSet {
    records: Vec<Record>,
    index: HashMap<(String, String), usize>,
}

impl DeduplicatedRecordSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a record. It replaces the kept one only with a strictly better
    /// coerced rank, so ties keep the first attempt seen.
    pub fn insert(&mut self, record: Record) {
        let key = (record.player_id.clone(), record.track_id.clone());
        match self.index.get(&key) {
            Some(&slot) => {
                if record.rank.coerced() < self.records[slot].rank.coerced() {
                    self.records[slot] = record;
                }
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
            }
        }
    }

    pub fn get(&self, player_id: &str, track_id: &str) -> Option<&Record> {
        self.index
            .get(&(player_id.to_string(), track_id.to_string()))
            .map(|&slot| &self.records[slot])
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &Record> {
        self.records.iter()
    }

    pub fn for_player<'a>(&'a self, player_id: &'a str) -> impl Iterator<Item = &'a Record> + 'a {
        self.records.iter().filter(move |r| r.player_id == player_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl FromIterator<Record> for DeduplicatedRecordSet {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut set = Self::new();
        for record in iter {
            set.insert(record);
        }
        set
    }
}

/// Collapse repeated attempts to the best-ranked one per (player, track).
///
/// Non-numeric or missing ranks compare as 999. The stored record keeps its
/// original rank text.
pub fn deduplicate<'a, I>(records: I) -> DeduplicatedRecordSet
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut seen = 0usize;
    let set: DeduplicatedRecordSet = records
        .into_iter()
        .inspect(|_| seen += 1)
        .cloned()
        .collect();
    debug!(input = seen, kept = set.len(), "Deduplicated records");
    set
}
