//! Ordered per-key counting.

use std::collections::HashMap;

/// Per-key counter that remembers first-seen order.
#[derive(Debug, Default)]
pub struct Tally<'a> {
    order: Vec<&'a str>,
    counts: HashMap<&'a str, u32>,
}

impl<'a> Tally<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a key without counting anything.
    pub fn touch(&mut self, key: &'a str) -> &mut u32 {
        if !self.counts.contains_key(key) {
            self.order.push(key);
        }
        self.counts.entry(key).or_insert(0)
    }

    pub fn add(&mut self, key: &'a str, amount: u32) {
        *self.touch(key) += amount;
    }

    pub fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Keys in first-seen order with their counts.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, u32)> + '_ {
        self.order.iter().map(|&p| (p, self.get(p)))
    }

    /// Highest positive count; the earliest key wins ties.
    pub fn leader(&self) -> Option<(&'a str, u32)> {
        let mut best: Option<(&'a str, u32)> = None;
        for (key, count) in self.iter() {
            if count > 0 && best.map_or(true, |(_, b)| count > b) {
                best = Some((key, count));
            }
        }
        best
    }
}

impl<'a> FromIterator<&'a str> for Tally<'a> {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut tally = Self::new();
        for key in iter {
            tally.add(key, 1);
        }
        tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tally_leader_prefers_first_seen() {
        let tally: Tally = ["bob", "alice", "alice", "bob", "carol"].into_iter().collect();
        assert_eq!(tally.leader(), Some(("bob", 2)));
    }

    #[test]
    fn test_tally_zero_is_no_leader() {
        let mut tally = Tally::new();
        tally.touch("alice");
        assert_eq!(tally.leader(), None);
        assert_eq!(tally.iter().count(), 1);
    }
}
