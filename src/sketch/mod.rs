pub mod signature;
pub mod sink;
pub mod source;

use crate::error::{FilterError, FilterResult};
use crate::types::MoleculeType;

pub use sink::{SignatureFileSink, SketchSink};
pub use source::{SignatureFileSource, SketchSource};

pub const DEFAULT_SEED: u64 = 42;

/// One scaled MinHash sketch together with the name of the sample it came from.
///
/// `hashes` is kept sorted and duplicate-free. When abundance is tracked,
/// `abundances` runs parallel to `hashes` and every entry is positive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sketch {
    name: String,
    filename: Option<String>,
    ksize: u32,
    molecule: MoleculeType,
    seed: u64,
    max_hash: u64,
    num: u32,
    hashes: Vec<u64>,
    abundances: Option<Vec<u64>>,
}

impl Sketch {
    /// Empty sketch; `ksize` is the user-facing k-mer size.
    pub fn new(
        name: impl Into<String>,
        ksize: u32,
        molecule: MoleculeType,
        max_hash: u64,
        track_abundance: bool,
    ) -> Self {
        Sketch {
            name: name.into(),
            filename: None,
            ksize: molecule.stored_ksize(ksize),
            molecule,
            seed: DEFAULT_SEED,
            max_hash,
            num: 0,
            hashes: Vec::new(),
            abundances: track_abundance.then(Vec::new),
        }
    }

    /// Builds a sketch from raw (possibly unsorted) hash and abundance vectors.
    /// Duplicate hashes are merged, summing their abundances.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        name: String,
        filename: Option<String>,
        stored_ksize: u32,
        molecule: MoleculeType,
        seed: u64,
        max_hash: u64,
        num: u32,
        hashes: Vec<u64>,
        abundances: Option<Vec<u64>>,
    ) -> Result<Self, String> {
        let mut sketch = Sketch {
            name,
            filename,
            ksize: stored_ksize,
            molecule,
            seed,
            max_hash,
            num,
            hashes: Vec::with_capacity(hashes.len()),
            abundances: None,
        };

        match abundances {
            Some(abunds) => {
                if abunds.len() != hashes.len() {
                    return Err(format!(
                        "{} hashes but {} abundances",
                        hashes.len(),
                        abunds.len()
                    ));
                }
                let mut pairs: Vec<(u64, u64)> = hashes.into_iter().zip(abunds).collect();
                pairs.sort_unstable_by_key(|&(hash, _)| hash);

                let mut merged: Vec<u64> = Vec::with_capacity(pairs.len());
                for (hash, abund) in pairs {
                    if abund == 0 {
                        continue;
                    }
                    if sketch.hashes.last() == Some(&hash) {
                        if let Some(total) = merged.last_mut() {
                            *total += abund;
                        }
                    } else {
                        sketch.hashes.push(hash);
                        merged.push(abund);
                    }
                }
                sketch.abundances = Some(merged);
            }
            None => {
                let mut hashes = hashes;
                hashes.sort_unstable();
                hashes.dedup();
                sketch.hashes = hashes;
            }
        }

        Ok(sketch)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn filename(&self) -> Option<&str> {
        self.filename.as_deref()
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// User-facing k-mer size.
    pub fn ksize(&self) -> u32 {
        self.molecule.user_ksize(self.ksize)
    }

    /// k-mer size as recorded in the signature file.
    pub fn stored_ksize(&self) -> u32 {
        self.ksize
    }

    pub fn molecule(&self) -> MoleculeType {
        self.molecule
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn max_hash(&self) -> u64 {
        self.max_hash
    }

    pub fn num(&self) -> u32 {
        self.num
    }

    pub fn hashes(&self) -> &[u64] {
        &self.hashes
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.hashes.binary_search(&hash).is_ok()
    }

    pub fn track_abundance(&self) -> bool {
        self.abundances.is_some()
    }

    pub fn abundances(&self) -> Option<&[u64]> {
        self.abundances.as_deref()
    }

    pub fn abundance(&self, hash: u64) -> Option<u64> {
        let abunds = self.abundances.as_ref()?;
        self.hashes
            .binary_search(&hash)
            .ok()
            .map(|idx| abunds[idx])
    }

    /// `(hash, abundance)` pairs in hash order; empty when abundance is not tracked.
    pub fn iter_abundances(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.hashes
            .iter()
            .copied()
            .zip(self.abundances.iter().flatten().copied())
    }

    /// The same sketch with abundance information dropped.
    pub fn flatten(&self) -> Sketch {
        Sketch {
            abundances: None,
            ..self.clone()
        }
    }

    /// Same parameters and name, no hashes. The filename is not carried over.
    pub fn copy_and_clear(&self) -> Sketch {
        Sketch {
            name: self.name.clone(),
            filename: None,
            ksize: self.ksize,
            molecule: self.molecule,
            seed: self.seed,
            max_hash: self.max_hash,
            num: self.num,
            hashes: Vec::new(),
            abundances: self.abundances.as_ref().map(|_| Vec::new()),
        }
    }

    /// Inserts a hash; a newly inserted hash gets abundance 1 when abundance is tracked.
    pub fn add_hash(&mut self, hash: u64) {
        if let Err(idx) = self.hashes.binary_search(&hash) {
            self.hashes.insert(idx, hash);
            if let Some(abunds) = self.abundances.as_mut() {
                abunds.insert(idx, 1);
            }
        }
    }

    pub fn add_many<I>(&mut self, hashes: I)
    where
        I: IntoIterator<Item = u64>,
    {
        for hash in hashes {
            self.add_hash(hash);
        }
    }

    /// Inserts `hash` with the given abundance, replacing any existing value.
    /// An abundance of zero is ignored.
    pub fn add_hash_with_abundance(&mut self, hash: u64, abundance: u64) -> FilterResult<()> {
        let abunds = self
            .abundances
            .as_mut()
            .ok_or(FilterError::AbundanceNotTracked)?;
        if abundance == 0 {
            return Ok(());
        }

        match self.hashes.binary_search(&hash) {
            Ok(idx) => abunds[idx] = abundance,
            Err(idx) => {
                self.hashes.insert(idx, hash);
                abunds.insert(idx, abundance);
            }
        }
        Ok(())
    }

    /// sourmash-compatible content digest over the stored ksize and the hashes.
    pub fn md5sum(&self) -> String {
        let mut buffer = self.ksize.to_string();
        for hash in &self.hashes {
            buffer.push_str(&hash.to_string());
        }
        format!("{:x}", md5::compute(buffer.as_bytes()))
    }
}
