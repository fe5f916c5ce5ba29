use crate::exceptions;
use crate::signature::{Normalizer, SignatureConfig};
use logsift_types::{LogEvent, LogGroup};
use std::collections::HashMap;

/// Streams events into per-signature groups.
///
/// Side effects are confined to the in-memory map; no I/O. Independent
/// aggregators (one per input file) combine with `merge`, which is the
/// sole synchronization point of parallel ingestion.
#[derive(Debug)]
pub struct Aggregator {
    normalizer: Normalizer,
    groups: HashMap<String, LogGroup>,
    total_events: u64,
}

impl Aggregator {
    pub fn new(config: SignatureConfig) -> Self {
        Self {
            normalizer: Normalizer::new(config),
            groups: HashMap::new(),
            total_events: 0,
        }
    }

    pub fn add(&mut self, event: &LogEvent) {
        let signature = self.normalizer.normalize(&event.message);
        let tokens = exceptions::extract(&event.message);
        self.groups
            .entry(signature.clone())
            .or_insert_with(|| LogGroup::new(signature))
            .record(event.level, &event.raw_line, tokens);
        self.total_events += 1;
    }

    /// Union another aggregator into this one, summing counts and
    /// histograms per signature. Conflict-free by construction.
    pub fn merge(&mut self, other: Aggregator) {
        for (signature, group) in other.groups {
            match self.groups.entry(signature) {
                std::collections::hash_map::Entry::Occupied(mut existing) => {
                    existing.get_mut().merge(group);
                }
                std::collections::hash_map::Entry::Vacant(slot) => {
                    slot.insert(group);
                }
            }
        }
        self.total_events += other.total_events;
    }

    pub fn total_events(&self) -> u64 {
        self.total_events
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Consume the aggregator, yielding groups sorted by descending count,
    /// tie-broken lexicographically for deterministic output.
    pub fn finalize(self) -> Vec<LogGroup> {
        let mut groups: Vec<LogGroup> = self.groups.into_values().collect();
        groups.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.signature.cmp(&b.signature))
        });
        groups
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new(SignatureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_line;
    use logsift_types::{Level, MAX_EXAMPLES};

    fn aggregate(lines: &[&str]) -> Aggregator {
        let mut aggregator = Aggregator::default();
        for line in lines {
            if let Some(event) = parse_line(line) {
                aggregator.add(&event);
            }
        }
        aggregator
    }

    #[test]
    fn test_groups_same_signature() {
        let groups = aggregate(&[
            "2024-01-01 10:00:00 ERROR NullPointerException at Foo.java:42",
            "2024-01-01 10:00:05 ERROR NullPointerException at Bar.java:17",
            "2024-01-01 10:00:10 INFO Service started",
        ])
        .finalize();

        assert_eq!(groups.len(), 2);

        let npe = &groups[0];
        assert_eq!(npe.count, 2);
        assert_eq!(npe.error_rate(), 1.0);
        assert!(npe.exception_tokens.contains("NullPointerException"));

        let started = &groups[1];
        assert_eq!(started.count, 1);
        assert_eq!(started.error_rate(), 0.0);
        assert!(started.exception_tokens.is_empty());
    }

    #[test]
    fn test_finalize_orders_by_count_then_signature() {
        let groups = aggregate(&[
            "2024-01-01 10:00:00 INFO beta occurred",
            "2024-01-01 10:00:01 INFO alpha occurred",
            "2024-01-01 10:00:02 INFO alpha occurred",
            "2024-01-01 10:00:03 INFO gamma occurred",
        ])
        .finalize();

        let signatures: Vec<&str> = groups.iter().map(|g| g.signature.as_str()).collect();
        assert_eq!(signatures, vec!["alpha occurred", "beta occurred", "gamma occurred"]);
    }

    #[test]
    fn test_merge_sums_overlapping_signatures() {
        let mut left = aggregate(&[
            "2024-01-01 10:00:00 ERROR disk full on /dev/sda1",
            "2024-01-01 10:00:01 WARN cache miss rate 90%",
        ]);
        let right = aggregate(&[
            "2024-01-01 11:00:00 ERROR disk full on /dev/sdb2",
            "2024-01-01 11:00:01 ERROR disk full on /dev/sdc3",
        ]);

        let left_total = left.total_events();
        let right_total = right.total_events();
        left.merge(right);
        assert_eq!(left.total_events(), left_total + right_total);

        let groups = left.finalize();
        let disk = groups.iter().find(|g| g.signature.contains("disk")).unwrap();
        assert_eq!(disk.count, 3);
        assert_eq!(disk.level_counts.get(&Level::Error), Some(&3));
        assert!(disk.examples.len() <= MAX_EXAMPLES);
    }

    #[test]
    fn test_merge_examples_capped() {
        let mut left = aggregate(&[
            "2024-01-01 10:00:00 INFO tick",
            "2024-01-01 10:00:01 INFO tick",
        ]);
        let right = aggregate(&[
            "2024-01-01 10:00:02 INFO tick",
            "2024-01-01 10:00:03 INFO tick",
        ]);
        left.merge(right);

        let groups = left.finalize();
        assert_eq!(groups[0].count, 4);
        assert_eq!(groups[0].examples.len(), MAX_EXAMPLES);
    }
}
