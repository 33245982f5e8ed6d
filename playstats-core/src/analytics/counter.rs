//! Insertion-ordered frequency counter
//!
//! Used to pick a song's representative album and track URI: the most
//! frequent value wins, and ties go to the value observed first.

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
struct CounterEntry {
    value: String,
    count: u64,
    /// Record index of the first observation
    first_seen: usize,
}

/// Frequency counter that remembers when each value was first observed.
///
/// Iteration follows insertion order. The tie-break itself uses the
/// recorded first-seen index, so merging partial counters built over
/// disjoint slices of the input (with global record indices) picks the
/// same representative as a single serial pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSeenCounter {
    entries: Vec<CounterEntry>,
    positions: HashMap<String, usize>,
}

impl FirstSeenCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observation of `value` at record index `seq`. Empty values are ignored.
    pub fn observe(&mut self, value: &str, seq: usize) {
        if value.is_empty() {
            return;
        }
        self.add(value, 1, seq);
    }

    fn add(&mut self, value: &str, count: u64, first_seen: usize) {
        match self.positions.get(value) {
            Some(&pos) => {
                let entry = &mut self.entries[pos];
                entry.count += count;
                entry.first_seen = entry.first_seen.min(first_seen);
            }
            None => {
                self.positions.insert(value.to_string(), self.entries.len());
                self.entries.push(CounterEntry {
                    value: value.to_string(),
                    count,
                    first_seen,
                });
            }
        }
    }

    /// Most frequent value, ties broken by earliest first observation.
    pub fn representative(&self) -> Option<&str> {
        self.entries
            .iter()
            .max_by(|a, b| {
                a.count
                    .cmp(&b.count)
                    .then_with(|| b.first_seen.cmp(&a.first_seen))
            })
            .map(|entry| entry.value.as_str())
    }

    /// Count for a value (0 if never observed).
    pub fn count(&self, value: &str) -> u64 {
        self.positions
            .get(value)
            .map(|&pos| self.entries[pos].count)
            .unwrap_or(0)
    }

    /// Values with their counts, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|e| (e.value.as_str(), e.count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Fold another counter into this one.
    pub fn merge(&mut self, other: FirstSeenCounter) {
        for entry in other.entries {
            self.add(&entry.value, entry.count, entry.first_seen);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_wins() {
        let mut counter = FirstSeenCounter::new();
        counter.observe("Single", 0);
        counter.observe("Album", 1);
        counter.observe("Album", 2);
        assert_eq!(counter.representative(), Some("Album"));
        assert_eq!(counter.count("Album"), 2);
    }

    #[test]
    fn test_tie_goes_to_first_seen() {
        let mut counter = FirstSeenCounter::new();
        counter.observe("Deluxe", 0);
        counter.observe("Original", 1);
        counter.observe("Original", 2);
        counter.observe("Deluxe", 3);
        assert_eq!(counter.representative(), Some("Deluxe"));
    }

    #[test]
    fn test_empty_values_are_ignored() {
        let mut counter = FirstSeenCounter::new();
        counter.observe("", 0);
        assert!(counter.is_empty());
        assert_eq!(counter.representative(), None);
    }

    #[test]
    fn test_iteration_is_insertion_ordered() {
        let mut counter = FirstSeenCounter::new();
        counter.observe("b", 0);
        counter.observe("a", 1);
        counter.observe("b", 2);
        let items: Vec<_> = counter.iter().collect();
        assert_eq!(items, vec![("b", 2), ("a", 1)]);
    }

    #[test]
    fn test_merge_keeps_global_first_seen() {
        // Serial: "X" at 0, "Y" at 1, "Y" at 2, "X" at 3 -> tie, X first
        let mut late = FirstSeenCounter::new();
        late.observe("Y", 2);
        late.observe("X", 3);

        let mut early = FirstSeenCounter::new();
        early.observe("X", 0);
        early.observe("Y", 1);

        // Merge in the "wrong" order: the partition holding later records first
        late.merge(early);
        assert_eq!(late.count("X"), 2);
        assert_eq!(late.count("Y"), 2);
        assert_eq!(late.representative(), Some("X"));
    }
}
