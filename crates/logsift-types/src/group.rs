use crate::Level;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Maximum number of example lines retained per group (first-seen, not sampled).
pub const MAX_EXAMPLES: usize = 3;

/// Aggregate statistics for all events sharing one signature.
///
/// Groups are mutated while events stream in and become read-only after
/// the aggregator finalizes. BTree containers keep serialized output
/// deterministic across runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogGroup {
    pub signature: String,
    pub count: u64,
    pub level_counts: BTreeMap<Level, u64>,
    pub examples: Vec<String>,
    pub exception_tokens: BTreeSet<String>,
}

impl LogGroup {
    pub fn new(signature: String) -> Self {
        Self {
            signature,
            count: 0,
            level_counts: BTreeMap::new(),
            examples: Vec::new(),
            exception_tokens: BTreeSet::new(),
        }
    }

    /// Fold one event into the group.
    pub fn record(&mut self, level: Level, raw_line: &str, tokens: BTreeSet<String>) {
        self.count += 1;
        *self.level_counts.entry(level).or_insert(0) += 1;
        if self.examples.len() < MAX_EXAMPLES {
            self.examples.push(raw_line.to_string());
        }
        self.exception_tokens.extend(tokens);
    }

    pub fn errors(&self) -> u64 {
        self.level_counts.get(&Level::Error).copied().unwrap_or(0)
    }

    /// Fraction of events at ERROR level, in [0, 1].
    pub fn error_rate(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.errors() as f64 / self.count as f64
        }
    }

    /// Combine another group for the same signature into this one.
    ///
    /// Commutative apart from example ordering: counts and histograms sum,
    /// token sets union, examples concatenate up to the cap. Used as the
    /// merge step after per-file parallel aggregation.
    pub fn merge(&mut self, other: LogGroup) {
        debug_assert_eq!(self.signature, other.signature);
        self.count += other.count;
        for (level, n) in other.level_counts {
            *self.level_counts.entry(level).or_insert(0) += n;
        }
        for example in other.examples {
            if self.examples.len() >= MAX_EXAMPLES {
                break;
            }
            self.examples.push(example);
        }
        self.exception_tokens.extend(other.exception_tokens);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group_with(signature: &str, levels: &[Level]) -> LogGroup {
        let mut g = LogGroup::new(signature.to_string());
        for (i, level) in levels.iter().enumerate() {
            g.record(*level, &format!("line {i}"), BTreeSet::new());
        }
        g
    }

    #[test]
    fn test_error_rate() {
        let g = group_with("db timeout", &[Level::Error, Level::Error, Level::Info]);
        assert_eq!(g.count, 3);
        assert_eq!(g.errors(), 2);
        assert!((g.error_rate() - 2.0 / 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_rate_empty_group_is_zero() {
        let g = LogGroup::new("empty".to_string());
        assert_eq!(g.error_rate(), 0.0);
    }

    #[test]
    fn test_examples_capped_at_first_seen() {
        let mut g = LogGroup::new("sig".to_string());
        for i in 0..5 {
            g.record(Level::Info, &format!("line {i}"), BTreeSet::new());
        }
        assert_eq!(g.count, 5);
        assert_eq!(g.examples, vec!["line 0", "line 1", "line 2"]);
    }

    #[test]
    fn test_merge_sums_counts_and_caps_examples() {
        let mut a = group_with("sig", &[Level::Error, Level::Info]);
        let mut b = group_with("sig", &[Level::Error, Level::Warn]);
        b.exception_tokens.insert("IOError".to_string());

        a.merge(b);
        assert_eq!(a.count, 4);
        assert_eq!(a.level_counts.get(&Level::Error), Some(&2));
        assert_eq!(a.level_counts.get(&Level::Warn), Some(&1));
        assert_eq!(a.examples.len(), MAX_EXAMPLES);
        assert!(a.exception_tokens.contains("IOError"));
    }

    #[test]
    fn test_merge_count_is_commutative() {
        let a = group_with("sig", &[Level::Error, Level::Info, Level::Info]);
        let b = group_with("sig", &[Level::Warn]);

        let mut left = a.clone();
        left.merge(b.clone());
        let mut right = b;
        right.merge(a);

        assert_eq!(left.count, right.count);
        assert_eq!(left.level_counts, right.level_counts);
        assert_eq!(left.exception_tokens, right.exception_tokens);
    }
}
