use super::retain::RetainSet;
use crate::error::FilterResult;
use crate::sketch::Sketch;

/// Restricts `sketch` to the hashes in `retain`, keeping abundances when the
/// sketch tracks them. The name is carried over; an empty result is still a
/// valid sketch.
pub fn filter_sketch(sketch: &Sketch, retain: &RetainSet) -> FilterResult<Sketch> {
    let mut filtered = sketch.copy_and_clear();

    if sketch.track_abundance() {
        for (hash, abundance) in sketch.iter_abundances() {
            if retain.contains(hash) {
                filtered.add_hash_with_abundance(hash, abundance)?;
            }
        }
    } else {
        filtered.add_many(
            sketch
                .hashes()
                .iter()
                .copied()
                .filter(|&hash| retain.contains(hash)),
        );
    }

    Ok(filtered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MoleculeType;

    #[test]
    fn test_keeps_intersection_and_name() {
        let mut sketch = Sketch::new("gut-42", 31, MoleculeType::Dna, 1 << 50, false)
            .with_filename("gut-42.fq.gz");
        sketch.add_many([1, 2, 3]);
        let retain: RetainSet = [2, 3, 4].into_iter().collect();

        let filtered = filter_sketch(&sketch, &retain).unwrap();
        assert_eq!(filtered.hashes(), &[2, 3]);
        assert_eq!(filtered.name(), "gut-42");
        assert_eq!(filtered.max_hash(), 1 << 50);
        assert!(!filtered.track_abundance());
    }

    #[test]
    fn test_preserves_abundance() {
        let mut sketch = Sketch::new("a", 21, MoleculeType::Dna, u64::MAX, true);
        sketch.add_hash_with_abundance(10, 4).unwrap();
        sketch.add_hash_with_abundance(20, 9).unwrap();
        let retain: RetainSet = [20].into_iter().collect();

        let filtered = filter_sketch(&sketch, &retain).unwrap();
        assert_eq!(filtered.hashes(), &[20]);
        assert_eq!(filtered.abundance(20), Some(9));
    }

    #[test]
    fn test_empty_intersection_still_produces_sketch() {
        let mut sketch = Sketch::new("a", 31, MoleculeType::Dna, u64::MAX, true);
        sketch.add_hash_with_abundance(1, 1).unwrap();

        let filtered = filter_sketch(&sketch, &RetainSet::default()).unwrap();
        assert!(filtered.is_empty());
        assert!(filtered.track_abundance());
        assert_eq!(filtered.name(), "a");
    }
}
