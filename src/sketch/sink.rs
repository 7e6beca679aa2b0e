use super::signature::SignatureRecord;
use super::Sketch;
use crate::error::{FilterError, FilterResult};
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Receives filtered sketches and persists them.
pub trait SketchSink {
    fn open(&mut self) -> FilterResult<()>;

    fn add(&mut self, sketch: &Sketch) -> FilterResult<()>;

    fn close(&mut self) -> FilterResult<()>;

    /// Number of sketches added so far.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

enum Destination {
    Stdout,
    File { path: PathBuf, compressed: bool },
}

enum OutputWriter {
    Stdout(BufWriter<Stdout>),
    Plain(BufWriter<File>),
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputWriter {
    /// Completes the stream and, for files, syncs it to disk.
    fn finish(self) -> io::Result<()> {
        let buffered = match self {
            OutputWriter::Stdout(mut writer) => return writer.flush(),
            OutputWriter::Plain(writer) => writer,
            OutputWriter::Gzip(encoder) => encoder.finish()?,
        };
        let file = buffered.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

impl Write for OutputWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            OutputWriter::Stdout(w) => w.write(buf),
            OutputWriter::Plain(w) => w.write(buf),
            OutputWriter::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            OutputWriter::Stdout(w) => w.flush(),
            OutputWriter::Plain(w) => w.flush(),
            OutputWriter::Gzip(w) => w.flush(),
        }
    }
}

/// Streams sketches into a single sourmash JSON signature file.
///
/// `-` writes to stdout. A `.gz` destination is gzip-compressed. File output
/// goes to a temporary file beside the destination that is renamed into place
/// on [`close`](SketchSink::close), so an aborted run leaves no partial file.
pub struct SignatureFileSink {
    location: String,
    destination: Destination,
    writer: Option<OutputWriter>,
    staging: Option<NamedTempFile>,
    written: usize,
}

impl SignatureFileSink {
    pub fn new(location: impl Into<String>) -> Self {
        let location = location.into();
        let destination = if location == "-" {
            Destination::Stdout
        } else {
            Destination::File {
                path: PathBuf::from(&location),
                compressed: location.ends_with(".gz"),
            }
        };

        Self {
            location,
            destination,
            writer: None,
            staging: None,
            written: 0,
        }
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    fn write_err(&self, source: io::Error) -> FilterError {
        FilterError::SinkWrite {
            location: self.location.clone(),
            source,
        }
    }

    fn not_open(&self) -> FilterError {
        self.write_err(io::Error::new(io::ErrorKind::Other, "output is not open"))
    }
}

fn write_record<W: Write>(writer: &mut W, first: bool, record: &SignatureRecord) -> io::Result<()> {
    if !first {
        writer.write_all(b",")?;
    }
    serde_json::to_writer(writer, record)?;
    Ok(())
}

fn staging_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

impl SketchSink for SignatureFileSink {
    fn open(&mut self) -> FilterResult<()> {
        let location = self.location.clone();
        let unavailable = |source: io::Error| FilterError::SinkUnavailable {
            location: location.clone(),
            source,
        };

        let mut writer = match &self.destination {
            Destination::Stdout => OutputWriter::Stdout(BufWriter::new(io::stdout())),
            Destination::File { path, compressed } => {
                let staging = NamedTempFile::new_in(staging_dir(path)).map_err(unavailable)?;
                let file = BufWriter::new(staging.reopen().map_err(unavailable)?);
                debug!("staging output in {}", staging.path().display());
                self.staging = Some(staging);
                if *compressed {
                    OutputWriter::Gzip(GzEncoder::new(file, Compression::new(6)))
                } else {
                    OutputWriter::Plain(file)
                }
            }
        };

        writer.write_all(b"[").map_err(unavailable)?;
        self.writer = Some(writer);
        self.written = 0;
        Ok(())
    }

    fn add(&mut self, sketch: &Sketch) -> FilterResult<()> {
        let record = SignatureRecord::from_sketch(sketch);

        let result = match self.writer.as_mut() {
            Some(writer) => write_record(writer, self.written == 0, &record),
            None => return Err(self.not_open()),
        };
        result.map_err(|e| self.write_err(e))?;

        self.written += 1;
        Ok(())
    }

    fn close(&mut self) -> FilterResult<()> {
        let mut writer = match self.writer.take() {
            Some(writer) => writer,
            None => return Err(self.not_open()),
        };

        writer
            .write_all(b"]\n")
            .and_then(|_| writer.finish())
            .map_err(|e| self.write_err(e))?;

        if let (Some(staging), Destination::File { path, .. }) =
            (self.staging.take(), &self.destination)
        {
            staging
                .persist(path)
                .map_err(|e| self.write_err(e.error))?;
        }
        Ok(())
    }

    fn len(&self) -> usize {
        self.written
    }
}
