use super::signature::load_signature_file;
use super::Sketch;
use crate::error::SourceError;
use crate::types::Selection;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

const SIGNATURE_SUFFIXES: [&str; 4] = [".sig", ".sig.gz", ".json", ".json.gz"];

/// Produces the sketches of each configured input location.
///
/// Implementations must already restrict their output to one k-mer size and
/// molecule type, and must return identical sequences every time a location
/// is loaded: the filter reads every input twice.
pub trait SketchSource: Sync {
    fn locations(&self) -> &[PathBuf];

    fn load(&self, location: &Path) -> Result<Vec<Sketch>, SourceError>;
}

/// Reads sourmash signature files, or directories of them, from disk.
pub struct SignatureFileSource {
    locations: Vec<PathBuf>,
    selection: Selection,
}

impl SignatureFileSource {
    pub fn new(locations: Vec<PathBuf>, selection: Selection) -> Self {
        Self {
            locations,
            selection,
        }
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    fn signature_files(&self, location: &Path) -> Result<Vec<PathBuf>, SourceError> {
        let metadata = fs::metadata(location).map_err(|source| SourceError::Io {
            path: location.to_path_buf(),
            source,
        })?;

        if !metadata.is_dir() {
            return Ok(vec![location.to_path_buf()]);
        }

        collect_signature_files(location)
    }
}

impl SketchSource for SignatureFileSource {
    fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    fn load(&self, location: &Path) -> Result<Vec<Sketch>, SourceError> {
        let mut selected = Vec::new();

        for path in self.signature_files(location)? {
            let sketches = load_signature_file(&path)?;
            let total = sketches.len();
            selected.extend(sketches.into_iter().filter(|s| self.selection.matches(s)));
            debug!(
                "{}: {} sketches, {} selected so far ({})",
                path.display(),
                total,
                selected.len(),
                self.selection
            );
        }

        Ok(selected)
    }
}

fn is_signature_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| {
            SIGNATURE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
        })
}

/// Signature files below `dir`, in sorted order.
///
/// Directory symlinks are not descended into; symlinks to files are kept.
fn collect_signature_files(dir: &Path) -> Result<Vec<PathBuf>, SourceError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.map_err(|e| SourceError::Io {
            path: e.path().unwrap_or(dir).to_path_buf(),
            source: io::Error::from(e),
        })?;

        if entry.file_type().is_dir() || !is_signature_file(entry.path()) {
            continue;
        }
        if entry.path_is_symlink() && !entry.path().is_file() {
            continue;
        }
        files.push(entry.into_path());
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::{SignatureFileSink, SketchSink};
    use crate::types::MoleculeType;
    use tempfile::TempDir;

    fn write_one(path: &Path, name: &str) {
        let mut sketch = Sketch::new(name, 31, MoleculeType::Dna, u64::MAX, false);
        sketch.add_many([1, 2, 3]);
        let mut sink = SignatureFileSink::new(path.to_string_lossy());
        sink.open().unwrap();
        sink.add(&sketch).unwrap();
        sink.close().unwrap();
    }

    #[test]
    fn test_signature_suffixes() {
        assert!(is_signature_file(Path::new("dir/a.sig")));
        assert!(is_signature_file(Path::new("a.sig.gz")));
        assert!(is_signature_file(Path::new("a.json")));
        assert!(!is_signature_file(Path::new("a.fastq.gz")));
        assert!(!is_signature_file(Path::new("notes.txt")));
    }

    #[test]
    fn test_directory_walk_is_sorted_and_recursive() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        write_one(&dir.path().join("b.sig"), "b");
        write_one(&dir.path().join("nested").join("a.sig.gz"), "a");
        std::fs::write(dir.path().join("readme.txt"), "not a signature").unwrap();

        let files = collect_signature_files(dir.path()).unwrap();
        assert_eq!(
            files,
            vec![
                dir.path().join("b.sig"),
                dir.path().join("nested").join("a.sig.gz"),
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_directory_symlink_loop_is_read_once() {
        let dir = TempDir::new().unwrap();
        write_one(&dir.path().join("a.sig"), "a");
        std::os::unix::fs::symlink(".", dir.path().join("loop")).unwrap();
        std::os::unix::fs::symlink(".", dir.path().join("loop.sig")).unwrap();

        let source = SignatureFileSource::new(vec![dir.path().to_path_buf()], Selection::default());
        let sketches = source.load(dir.path()).unwrap();
        assert_eq!(sketches.len(), 1);
        assert_eq!(sketches[0].name(), "a");
    }

    #[cfg(unix)]
    #[test]
    fn test_file_symlinks_are_followed() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = elsewhere.path().join("real.sig");
        write_one(&target, "linked");
        std::os::unix::fs::symlink(&target, dir.path().join("link.sig")).unwrap();

        let source = SignatureFileSource::new(vec![dir.path().to_path_buf()], Selection::default());
        let sketches = source.load(dir.path()).unwrap();
        assert_eq!(sketches.len(), 1);
        assert_eq!(sketches[0].name(), "linked");
    }
}
