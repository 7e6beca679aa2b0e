pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod sketch;
pub mod types;
pub mod utils;

pub use error::{FilterError, FilterResult, Pass, SourceError};
pub use filter::{filter_sketch, FilterOptions, FilterSummary, HashFrequencyTable, RetainSet, ThresholdRule};
pub use sketch::{SignatureFileSink, SignatureFileSource, Sketch, SketchSink, SketchSource};
pub use types::{MoleculeType, Selection};
