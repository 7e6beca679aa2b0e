use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Which of the two passes over the inputs was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Counting,
    Filtering,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pass::Counting => f.write_str("pass 1 (counting)"),
            Pass::Filtering => f.write_str("pass 2 (filtering)"),
        }
    }
}

/// Failure to produce the sketches of one input location.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot decompress '{}': {source}", path.display())]
    Compression {
        path: PathBuf,
        #[source]
        source: niffler::Error,
    },

    #[error("'{}' is not a signature file: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' is malformed: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },
}

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("input '{}' unavailable during {pass}", location.display())]
    SourceUnavailable {
        location: PathBuf,
        pass: Pass,
        #[source]
        source: SourceError,
    },

    #[error("cannot open output '{location}' for writing")]
    SinkUnavailable {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("failed writing output '{location}'")]
    SinkWrite {
        location: String,
        #[source]
        source: io::Error,
    },

    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("sketch does not track abundance")]
    AbundanceNotTracked,

    #[error("a counting worker panicked")]
    WorkerPanicked,
}

pub type FilterResult<T> = Result<T, FilterError>;
