use crate::error::{FilterError, FilterResult, Pass};
use crate::sketch::{Sketch, SketchSource};
use crate::utils::threading::{run_pool, Worker};
use indicatif::ProgressBar;
use seahash::SeaHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasherDefault;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub(crate) type SeaBuildHasher = BuildHasherDefault<SeaHasher>;

/// For every hash seen, the number of distinct sketches containing it.
#[derive(Debug, Clone, Default)]
pub struct HashFrequencyTable {
    counts: HashMap<u64, u32, SeaBuildHasher>,
    sketches: usize,
}

impl HashFrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts each hash of the sketch once, ignoring abundance.
    pub fn add_sketch(&mut self, sketch: &Sketch) {
        self.counts.reserve(sketch.len());
        for &hash in sketch.hashes() {
            *self.counts.entry(hash).or_insert(0) += 1;
        }
        self.sketches += 1;
    }

    /// Sums another partial table into this one.
    pub fn merge(&mut self, other: HashFrequencyTable) {
        if self.counts.is_empty() {
            self.counts = other.counts;
        } else {
            for (hash, count) in other.counts {
                *self.counts.entry(hash).or_insert(0) += count;
            }
        }
        self.sketches += other.sketches;
    }

    pub fn get(&self, hash: u64) -> u32 {
        self.counts.get(&hash).copied().unwrap_or(0)
    }

    /// Number of distinct hashes.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn sketches_counted(&self) -> usize {
        self.sketches
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u32)> + '_ {
        self.counts.iter().map(|(&hash, &count)| (hash, count))
    }

    /// Number of hashes found in exactly `n` sketches, keyed by `n`.
    pub fn occurrence_histogram(&self) -> BTreeMap<u32, usize> {
        let mut histogram = BTreeMap::new();
        for &count in self.counts.values() {
            *histogram.entry(count).or_insert(0) += 1;
        }
        histogram
    }
}

/// Result of pass 1 over every input location.
#[derive(Debug, Default)]
pub struct CountOutcome {
    pub table: HashFrequencyTable,
    /// Sketches loaded per location, in input order.
    pub per_location: Vec<(PathBuf, usize)>,
}

struct CountingWorker<'a, S: SketchSource + ?Sized> {
    source: &'a S,
    progress: ProgressBar,
    table: HashFrequencyTable,
    per_location: Vec<(usize, usize)>,
}

impl<'a, S: SketchSource + ?Sized> Clone for CountingWorker<'a, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            progress: self.progress.clone(),
            table: self.table.clone(),
            per_location: self.per_location.clone(),
        }
    }
}

impl<'a, S: SketchSource + ?Sized> Worker for CountingWorker<'a, S> {
    type Job = (usize, &'a Path);

    fn process(&mut self, (idx, location): Self::Job) -> FilterResult<()> {
        let loaded = count_location(self.source, location, &mut self.table)?;
        self.per_location.push((idx, loaded));
        self.progress.inc(1);
        Ok(())
    }

    fn merge_worker(&mut self, other: Self) {
        self.table.merge(other.table);
        self.per_location.extend(other.per_location);
    }
}

fn count_location<S: SketchSource + ?Sized>(
    source: &S,
    location: &Path,
    table: &mut HashFrequencyTable,
) -> FilterResult<usize> {
    let sketches = source
        .load(location)
        .map_err(|e| FilterError::SourceUnavailable {
            location: location.to_path_buf(),
            pass: Pass::Counting,
            source: e,
        })?;

    if sketches.is_empty() {
        warn!(
            "{}: no sketches match the selection; continuing",
            location.display()
        );
    }
    for sketch in &sketches {
        table.add_sketch(sketch);
    }
    debug!("{}: counted {} sketches", location.display(), sketches.len());

    Ok(sketches.len())
}

/// Pass 1: builds the frequency table over every location of `source`.
///
/// With more than one thread, locations are spread over workers that each own
/// a private partial table; the partial tables are summed once all workers
/// finish, so the result does not depend on `threads`.
pub fn count_hashes<S: SketchSource + ?Sized>(
    source: &S,
    threads: usize,
    progress: &ProgressBar,
) -> FilterResult<CountOutcome> {
    let locations = source.locations();

    if threads <= 1 || locations.len() <= 1 {
        let mut outcome = CountOutcome::default();
        for location in locations {
            let loaded = count_location(source, location, &mut outcome.table)?;
            outcome.per_location.push((location.clone(), loaded));
            progress.inc(1);
        }
        return Ok(outcome);
    }

    let prototype = CountingWorker {
        source,
        progress: progress.clone(),
        table: HashFrequencyTable::new(),
        per_location: Vec::new(),
    };
    let jobs = locations
        .iter()
        .enumerate()
        .map(|(idx, location)| (idx, location.as_path()));

    let mut merged = run_pool(prototype, jobs, threads.min(locations.len()))?;
    merged.per_location.sort_unstable_by_key(|&(idx, _)| idx);

    Ok(CountOutcome {
        table: merged.table,
        per_location: merged
            .per_location
            .into_iter()
            .map(|(idx, loaded)| (locations[idx].clone(), loaded))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoleculeType;

    fn sketch(hashes: &[u64]) -> Sketch {
        let mut sketch = Sketch::new("s", 31, MoleculeType::Dna, u64::MAX, false);
        sketch.add_many(hashes.iter().copied());
        sketch
    }

    #[test]
    fn test_counts_distinct_sketches() {
        let mut table = HashFrequencyTable::new();
        for hashes in [&[1, 2, 3][..], &[2, 3, 4], &[3, 4, 5]] {
            table.add_sketch(&sketch(hashes));
        }

        assert_eq!(table.sketches_counted(), 3);
        assert_eq!(table.len(), 5);
        assert_eq!(
            (1..=5).map(|h| table.get(h)).collect::<Vec<_>>(),
            vec![1, 2, 3, 2, 1]
        );
        assert_eq!(table.get(99), 0);
    }

    #[test]
    fn test_abundance_does_not_inflate_counts() {
        let mut abund = Sketch::new("a", 31, MoleculeType::Dna, u64::MAX, true);
        abund.add_hash_with_abundance(7, 50).unwrap();

        let mut table = HashFrequencyTable::new();
        table.add_sketch(&abund);
        table.add_sketch(&abund.flatten());
        assert_eq!(table.get(7), 2);
    }

    #[test]
    fn test_merge_sums_partial_tables() {
        let mut left = HashFrequencyTable::new();
        left.add_sketch(&sketch(&[1, 2]));
        let mut right = HashFrequencyTable::new();
        right.add_sketch(&sketch(&[2, 3]));
        right.add_sketch(&sketch(&[2]));

        left.merge(right);
        assert_eq!(left.sketches_counted(), 3);
        assert_eq!(left.get(2), 3);
        assert_eq!(left.get(3), 1);

        let mut empty = HashFrequencyTable::new();
        empty.merge(left.clone());
        assert_eq!(empty.get(2), 3);
        assert_eq!(empty.sketches_counted(), 3);
    }

    #[test]
    fn test_occurrence_histogram() {
        let mut table = HashFrequencyTable::new();
        for hashes in [&[1, 2, 3][..], &[2, 3, 4], &[3, 4, 5]] {
            table.add_sketch(&sketch(hashes));
        }
        let histogram = table.occurrence_histogram();
        assert_eq!(histogram.get(&1), Some(&2));
        assert_eq!(histogram.get(&2), Some(&2));
        assert_eq!(histogram.get(&3), Some(&1));
    }
}
