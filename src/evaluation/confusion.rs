use std::cmp::Reverse;
use std::collections::HashMap;

use serde::ser::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct ConfusionKey {
    pub ground_truth: String,
    pub prediction: String,
}

impl ConfusionKey {
    pub fn new(ground_truth: impl Into<String>, prediction: impl Into<String>) -> Self {
        Self {
            ground_truth: ground_truth.into(),
            prediction: prediction.into(),
        }
    }

    pub fn width(&self) -> usize {
        self.ground_truth
            .chars()
            .count()
            .max(self.prediction.chars().count())
    }
}

/// Occurrence counts per mismatched segment pattern.
///
/// Only grows: keys are inserted or incremented, never removed. Merging is
/// key-wise addition, so any merge order gives the same table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfusionTable {
    counts: HashMap<ConfusionKey, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ConfusionEntry<'a> {
    pub ground_truth: &'a str,
    pub prediction: &'a str,
    pub count: u64,
}

impl ConfusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, key: ConfusionKey) {
        self.add(key, 1);
    }

    pub fn add(&mut self, key: ConfusionKey, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(key).or_insert(0) += count;
    }

    pub fn merge(&mut self, other: &ConfusionTable) {
        for (key, &count) in &other.counts {
            self.add(key.clone(), count);
        }
    }

    pub fn get(&self, key: &ConfusionKey) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ConfusionKey, u64)> {
        self.counts.iter().map(|(key, &count)| (key, count))
    }

    /// Sum of all occurrence counts.
    pub fn total_occurrences(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Entries ordered by count (descending), ties broken by key.
    pub fn sorted_entries(&self) -> Vec<ConfusionEntry<'_>> {
        let mut entries: Vec<_> = self.counts.iter().collect();
        entries.sort_by(|(key_a, count_a), (key_b, count_b)| {
            Reverse(*count_a)
                .cmp(&Reverse(*count_b))
                .then_with(|| key_a.cmp(key_b))
        });
        entries
            .into_iter()
            .map(|(key, &count)| ConfusionEntry {
                ground_truth: &key.ground_truth,
                prediction: &key.prediction,
                count,
            })
            .collect()
    }

    pub fn top_n(&self, n: usize) -> Vec<ConfusionEntry<'_>> {
        let mut entries = self.sorted_entries();
        entries.truncate(n);
        entries
    }
}

impl Serialize for ConfusionTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.sorted_entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(entries: &[(&str, &str, u64)]) -> ConfusionTable {
        let mut table = ConfusionTable::new();
        for &(gt, pred, count) in entries {
            table.add(ConfusionKey::new(gt, pred), count);
        }
        table
    }

    #[test]
    fn record_increments_existing_key() {
        let mut table = ConfusionTable::new();
        table.record(ConfusionKey::new("a", "o"));
        table.record(ConfusionKey::new("a", "o"));
        table.record(ConfusionKey::new("rn", "m"));
        assert_eq!(table.get(&ConfusionKey::new("a", "o")), 2);
        assert_eq!(table.get(&ConfusionKey::new("rn", "m")), 1);
        assert_eq!(table.len(), 2);
        assert_eq!(table.total_occurrences(), 3);
    }

    #[test]
    fn merge_is_commutative() {
        let left = table(&[("a", "o", 2), ("l", "1", 1)]);
        let right = table(&[("a", "o", 1), ("", "x", 4)]);

        let mut lr = left.clone();
        lr.merge(&right);
        let mut rl = right.clone();
        rl.merge(&left);

        assert_eq!(lr, rl);
        assert_eq!(lr.get(&ConfusionKey::new("a", "o")), 3);
        assert_eq!(lr.get(&ConfusionKey::new("", "x")), 4);
    }

    #[test]
    fn zero_count_does_not_create_key() {
        let mut table = ConfusionTable::new();
        table.add(ConfusionKey::new("a", "b"), 0);
        assert!(table.is_empty());
    }

    #[test]
    fn top_n_orders_by_count_then_key() {
        let table = table(&[("b", "x", 2), ("a", "x", 2), ("c", "", 5), ("d", "e", 1)]);
        let top = table.top_n(3);
        let keys: Vec<_> = top.iter().map(|e| (e.ground_truth, e.count)).collect();
        assert_eq!(keys, vec![("c", 5), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn serializes_as_sorted_entry_list() {
        let table = table(&[("a", "o", 1), ("rn", "m", 3)]);
        let json = serde_json::to_value(&table).expect("serialize confusion table");
        assert_eq!(
            json,
            serde_json::json!([
                {"ground_truth": "rn", "prediction": "m", "count": 3},
                {"ground_truth": "a", "prediction": "o", "count": 1}
            ])
        );
    }

    #[test]
    fn key_width_counts_chars_not_bytes() {
        assert_eq!(ConfusionKey::new("ü", "").width(), 1);
        assert_eq!(ConfusionKey::new("rn", "m").width(), 2);
    }
}
