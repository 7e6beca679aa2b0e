//! sourmash JSON signature files.
//!
//! A file holds a JSON array of signatures (older files hold a single bare
//! object). Every signature wraps one or more MinHash records; each record is
//! surfaced as its own [`Sketch`].

use super::{Sketch, DEFAULT_SEED};
use crate::error::SourceError;
use crate::types::MoleculeType;
use niffler::get_reader;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::warn;

pub const SIGNATURE_CLASS: &str = "sourmash_signature";
pub const HASH_FUNCTION: &str = "0.murmur64";
pub const LICENSE: &str = "CC0";
pub const SIGNATURE_VERSION: f64 = 0.4;

#[derive(Debug, Serialize, Deserialize)]
pub struct SignatureRecord {
    #[serde(default = "default_class")]
    pub class: String,

    #[serde(default)]
    pub email: String,

    #[serde(default = "default_hash_function")]
    pub hash_function: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default = "default_license")]
    pub license: String,

    pub signatures: Vec<MinHashRecord>,

    #[serde(default = "default_version")]
    pub version: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MinHashRecord {
    #[serde(default)]
    pub num: u32,

    pub ksize: u32,

    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default)]
    pub max_hash: u64,

    #[serde(default)]
    pub mins: Vec<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5sum: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abundances: Option<Vec<u64>>,

    pub molecule: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SignatureDocument {
    Many(Vec<SignatureRecord>),
    One(SignatureRecord),
}

fn default_class() -> String {
    SIGNATURE_CLASS.to_string()
}

fn default_hash_function() -> String {
    HASH_FUNCTION.to_string()
}

fn default_license() -> String {
    LICENSE.to_string()
}

fn default_version() -> f64 {
    SIGNATURE_VERSION
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

impl SignatureRecord {
    /// Wraps a single sketch as a signature ready for output.
    pub fn from_sketch(sketch: &Sketch) -> Self {
        let name = (!sketch.name().is_empty()).then(|| sketch.name().to_string());

        SignatureRecord {
            class: default_class(),
            email: String::new(),
            hash_function: default_hash_function(),
            filename: sketch.filename().map(str::to_string),
            name,
            license: default_license(),
            signatures: vec![MinHashRecord {
                num: sketch.num(),
                ksize: sketch.stored_ksize(),
                seed: sketch.seed(),
                max_hash: sketch.max_hash(),
                mins: sketch.hashes().to_vec(),
                md5sum: Some(sketch.md5sum()),
                abundances: sketch.abundances().map(<[u64]>::to_vec),
                molecule: sketch.molecule().as_str().to_string(),
            }],
            version: SIGNATURE_VERSION,
        }
    }

    /// Splits the signature into one sketch per MinHash record.
    /// Records with an unrecognized molecule are skipped.
    pub fn into_sketches(self, path: &Path) -> Result<Vec<Sketch>, SourceError> {
        let name = self.name.unwrap_or_default();
        let mut sketches = Vec::with_capacity(self.signatures.len());

        for record in self.signatures {
            let molecule: MoleculeType = match record.molecule.parse() {
                Ok(molecule) => molecule,
                Err(e) => {
                    warn!("{}: skipping sketch '{}': {}", path.display(), name, e);
                    continue;
                }
            };

            let sketch = Sketch::from_parts(
                name.clone(),
                self.filename.clone(),
                record.ksize,
                molecule,
                record.seed,
                record.max_hash,
                record.num,
                record.mins,
                record.abundances,
            )
            .map_err(|reason| SourceError::Malformed {
                path: path.to_path_buf(),
                reason: format!("sketch '{}': {}", name, reason),
            })?;
            sketches.push(sketch);
        }

        Ok(sketches)
    }
}

/// Parses every sketch in a signature document read from `reader`.
pub fn read_signatures<R: Read>(reader: R, path: &Path) -> Result<Vec<Sketch>, SourceError> {
    let document: SignatureDocument =
        serde_json::from_reader(reader).map_err(|source| SourceError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let records = match document {
        SignatureDocument::Many(records) => records,
        SignatureDocument::One(record) => vec![record],
    };

    let mut sketches = Vec::new();
    for record in records {
        sketches.extend(record.into_sketches(path)?);
    }
    Ok(sketches)
}

/// Opens a signature file, decompressing it if needed, and parses all sketches.
pub fn load_signature_file(path: &Path) -> Result<Vec<Sketch>, SourceError> {
    let file = File::open(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let (inner_reader, _compression) =
        get_reader(Box::new(file)).map_err(|source| SourceError::Compression {
            path: path.to_path_buf(),
            source,
        })?;

    read_signatures(BufReader::with_capacity(1024 * 1024, inner_reader), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const TWO_SKETCHES: &str = r#"[{
        "class": "sourmash_signature",
        "email": "",
        "hash_function": "0.murmur64",
        "filename": "sample.fa",
        "name": "sample",
        "license": "CC0",
        "signatures": [
            {"num": 0, "ksize": 21, "seed": 42, "max_hash": 18446744073709552,
             "mins": [5, 1, 3], "md5sum": "x", "molecule": "DNA"},
            {"num": 0, "ksize": 30, "seed": 42, "max_hash": 18446744073709552,
             "mins": [7, 8], "abundances": [2, 4], "molecule": "protein"}
        ],
        "version": 0.4
    }]"#;

    #[test]
    fn test_read_signature_array() {
        let sketches = read_signatures(TWO_SKETCHES.as_bytes(), &PathBuf::from("t.sig")).unwrap();
        assert_eq!(sketches.len(), 2);

        assert_eq!(sketches[0].name(), "sample");
        assert_eq!(sketches[0].filename(), Some("sample.fa"));
        assert_eq!(sketches[0].ksize(), 21);
        assert_eq!(sketches[0].hashes(), &[1, 3, 5]);
        assert!(!sketches[0].track_abundance());

        assert_eq!(sketches[1].molecule(), MoleculeType::Protein);
        assert_eq!(sketches[1].ksize(), 10);
        assert_eq!(sketches[1].abundance(8), Some(4));
    }

    #[test]
    fn test_read_single_object() {
        let single = r#"{"name": "solo", "signatures": [
            {"ksize": 31, "max_hash": 100, "mins": [1], "molecule": "dna"}]}"#;
        let sketches = read_signatures(single.as_bytes(), &PathBuf::from("s.sig")).unwrap();
        assert_eq!(sketches.len(), 1);
        assert_eq!(sketches[0].seed(), DEFAULT_SEED);
        assert_eq!(sketches[0].molecule(), MoleculeType::Dna);
    }

    #[test]
    fn test_unknown_molecule_is_skipped() {
        let doc = r#"[{"signatures": [
            {"ksize": 31, "mins": [1], "molecule": "rna"},
            {"ksize": 31, "mins": [2], "molecule": "DNA"}]}]"#;
        let sketches = read_signatures(doc.as_bytes(), &PathBuf::from("m.sig")).unwrap();
        assert_eq!(sketches.len(), 1);
        assert_eq!(sketches[0].hashes(), &[2]);
    }

    #[test]
    fn test_mismatched_abundances_are_malformed() {
        let doc = r#"[{"signatures": [
            {"ksize": 31, "mins": [1, 2], "abundances": [1], "molecule": "DNA"}]}]"#;
        let err = read_signatures(doc.as_bytes(), &PathBuf::from("bad.sig")).unwrap_err();
        assert!(matches!(err, SourceError::Malformed { .. }));
    }

    #[test]
    fn test_record_from_sketch_omits_missing_fields() {
        let mut sketch = Sketch::new("", 31, MoleculeType::Dna, 1000, false);
        sketch.add_many([2, 1]);

        let value = serde_json::to_value(SignatureRecord::from_sketch(&sketch)).unwrap();
        assert!(value.get("name").is_none());
        assert!(value.get("filename").is_none());
        let minhash = &value["signatures"][0];
        assert!(minhash.get("abundances").is_none());
        assert_eq!(minhash["mins"], serde_json::json!([1, 2]));
        assert_eq!(minhash["molecule"], "DNA");
        assert_eq!(minhash["md5sum"], sketch.md5sum().as_str());
    }
}
