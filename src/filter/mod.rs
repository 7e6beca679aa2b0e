//! Two-pass hash occurrence filtering.
//!
//! Pass 1 counts, for every hash, how many sketches contain it. A
//! [`ThresholdRule`] turns that table into a [`RetainSet`], and pass 2
//! rewrites each sketch restricted to the retained hashes.

pub mod counter;
pub mod retain;
pub mod run;
pub mod sketch_filter;

pub use counter::{count_hashes, CountOutcome, HashFrequencyTable};
pub use retain::{RetainSet, ThresholdRule};
pub use run::{occurrence, run, FilterOptions, FilterSummary, LocationSummary, OccurrenceSummary};
pub use sketch_filter::filter_sketch;
