use super::counter::{HashFrequencyTable, SeaBuildHasher};
use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Keep a hash when it occurs in at least `min_samples` sketches and, if a
/// maximum is set, in no more than `max_samples`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdRule {
    pub min_samples: u32,
    pub max_samples: Option<u32>,
}

impl ThresholdRule {
    pub fn new(min_samples: u32, max_samples: Option<u32>) -> FilterResult<Self> {
        if let Some(max) = max_samples {
            if max < min_samples {
                return Err(FilterError::InvalidParameter(format!(
                    "max-samples ({}) is below min-samples ({})",
                    max, min_samples
                )));
            }
        }
        Ok(Self {
            min_samples,
            max_samples,
        })
    }

    pub fn min_only(min_samples: u32) -> Self {
        Self {
            min_samples,
            max_samples: None,
        }
    }

    pub fn accepts(&self, count: u32) -> bool {
        count >= self.min_samples && self.max_samples.map_or(true, |max| count <= max)
    }
}

impl Default for ThresholdRule {
    fn default() -> Self {
        Self::min_only(2)
    }
}

impl fmt::Display for ThresholdRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max_samples {
            Some(max) => write!(f, "between {} and {} samples", self.min_samples, max),
            None => write!(f, "in {} or more samples", self.min_samples),
        }
    }
}

/// Hashes to keep during pass 2. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct RetainSet {
    hashes: HashSet<u64, SeaBuildHasher>,
}

impl RetainSet {
    /// Single pass over the table, keeping every hash the rule accepts.
    pub fn build(table: &HashFrequencyTable, rule: &ThresholdRule) -> Self {
        let hashes = table
            .iter()
            .filter(|&(_, count)| rule.accepts(count))
            .map(|(hash, _)| hash)
            .collect();
        Self { hashes }
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.hashes.contains(&hash)
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.hashes.iter().copied()
    }
}

impl FromIterator<u64> for RetainSet {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self {
            hashes: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::Sketch;
    use crate::types::MoleculeType;

    fn table(sets: &[&[u64]]) -> HashFrequencyTable {
        let mut table = HashFrequencyTable::new();
        for hashes in sets {
            let mut sketch = Sketch::new("s", 31, MoleculeType::Dna, u64::MAX, false);
            sketch.add_many(hashes.iter().copied());
            table.add_sketch(&sketch);
        }
        table
    }

    fn sorted(retain: &RetainSet) -> Vec<u64> {
        let mut hashes: Vec<u64> = retain.iter().collect();
        hashes.sort_unstable();
        hashes
    }

    #[test]
    fn test_min_samples() {
        let table = table(&[&[1, 2, 3], &[2, 3, 4], &[3, 4, 5]]);
        let retain = RetainSet::build(&table, &ThresholdRule::min_only(2));
        assert_eq!(sorted(&retain), vec![2, 3, 4]);
    }

    #[test]
    fn test_min_and_max_samples() {
        let table = table(&[&[1, 2, 3], &[2, 3, 4], &[3, 4, 5]]);
        let rule = ThresholdRule::new(2, Some(2)).unwrap();
        assert_eq!(sorted(&RetainSet::build(&table, &rule)), vec![2, 4]);
    }

    #[test]
    fn test_threshold_above_sample_count_is_empty() {
        let table = table(&[&[1, 2], &[2]]);
        let retain = RetainSet::build(&table, &ThresholdRule::min_only(3));
        assert!(retain.is_empty());
    }

    #[test]
    fn test_zero_and_one_keep_everything() {
        let table = table(&[&[1, 2], &[2, 9]]);
        for min in [0, 1] {
            let retain = RetainSet::build(&table, &ThresholdRule::min_only(min));
            assert_eq!(sorted(&retain), vec![1, 2, 9]);
        }
    }

    #[test]
    fn test_max_below_min_is_rejected() {
        assert!(matches!(
            ThresholdRule::new(3, Some(2)),
            Err(FilterError::InvalidParameter(_))
        ));
    }
}
