#![allow(dead_code)]

use sketch_filter::sketch::signature::SignatureRecord;
use sketch_filter::{FilterResult, MoleculeType, Sketch, SketchSink, SketchSource, SourceError};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

pub const MAX_HASH: u64 = u64::MAX / 1000;

pub fn flat_sketch(name: &str, hashes: &[u64]) -> Sketch {
    let mut sketch = Sketch::new(name, 31, MoleculeType::Dna, MAX_HASH, false);
    sketch.add_many(hashes.iter().copied());
    sketch
}

pub fn abund_sketch(name: &str, pairs: &[(u64, u64)]) -> Sketch {
    let mut sketch = Sketch::new(name, 31, MoleculeType::Dna, MAX_HASH, true);
    for &(hash, abundance) in pairs {
        sketch.add_hash_with_abundance(hash, abundance).unwrap();
    }
    sketch
}

/// Serves fixed sketches per location and counts how often each is loaded.
pub struct MemorySource {
    locations: Vec<PathBuf>,
    sketches: HashMap<PathBuf, Vec<Sketch>>,
    pub loads: AtomicUsize,
}

impl MemorySource {
    pub fn new(groups: Vec<(&str, Vec<Sketch>)>) -> Self {
        let locations = groups.iter().map(|(name, _)| PathBuf::from(name)).collect();
        let sketches = groups
            .into_iter()
            .map(|(name, sketches)| (PathBuf::from(name), sketches))
            .collect();
        Self {
            locations,
            sketches,
            loads: AtomicUsize::new(0),
        }
    }

    /// One location per sketch.
    pub fn one_per_location(sketches: Vec<Sketch>) -> Self {
        let names: Vec<String> = (0..sketches.len()).map(|i| format!("loc{}", i)).collect();
        Self::new(
            names
                .iter()
                .map(String::as_str)
                .zip(sketches.into_iter().map(|s| vec![s]))
                .collect(),
        )
    }
}

impl SketchSource for MemorySource {
    fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    fn load(&self, location: &Path) -> Result<Vec<Sketch>, SourceError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        self.sketches
            .get(location)
            .cloned()
            .ok_or_else(|| SourceError::Malformed {
                path: location.to_path_buf(),
                reason: "no such location".to_string(),
            })
    }
}

#[derive(Default)]
pub struct CollectingSink {
    pub opened: bool,
    pub closed: bool,
    pub sketches: Vec<Sketch>,
}

impl SketchSink for CollectingSink {
    fn open(&mut self) -> FilterResult<()> {
        self.opened = true;
        Ok(())
    }

    fn add(&mut self, sketch: &Sketch) -> FilterResult<()> {
        assert!(self.opened && !self.closed);
        self.sketches.push(sketch.clone());
        Ok(())
    }

    fn close(&mut self) -> FilterResult<()> {
        self.closed = true;
        Ok(())
    }

    fn len(&self) -> usize {
        self.sketches.len()
    }
}

pub fn write_signature_file(path: &Path, sketches: &[Sketch]) {
    let records: Vec<SignatureRecord> = sketches.iter().map(SignatureRecord::from_sketch).collect();
    let writer = BufWriter::new(File::create(path).unwrap());
    serde_json::to_writer(writer, &records).unwrap();
}
