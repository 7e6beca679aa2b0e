use super::counter::{count_hashes, CountOutcome};
use super::retain::{RetainSet, ThresholdRule};
use super::sketch_filter::filter_sketch;
use crate::error::{FilterError, FilterResult, Pass};
use crate::sketch::{SketchSink, SketchSource};
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use indicatif::ProgressBar;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::{info, warn};

const PASS_TEMPLATE: &str = "{spinner:.green} [{elapsed_precise}] {msg} [{bar:40.cyan/blue}] {pos}/{len}";

#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    pub rule: ThresholdRule,
    pub threads: usize,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            rule: ThresholdRule::default(),
            threads: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationSummary {
    pub location: PathBuf,
    pub sketches: usize,
}

/// Counts reported after a successful run.
#[derive(Debug, Clone, Serialize)]
pub struct FilterSummary {
    pub rule: ThresholdRule,
    pub locations: Vec<LocationSummary>,
    pub sketches_loaded: usize,
    pub distinct_hashes: usize,
    pub retained_hashes: usize,
    pub sketches_written: usize,
}

impl FilterSummary {
    /// Locations that produced no sketch for the selection.
    pub fn empty_locations(&self) -> impl Iterator<Item = &LocationSummary> {
        self.locations.iter().filter(|l| l.sketches == 0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct OccurrenceSummary {
    pub locations: Vec<LocationSummary>,
    pub sketches_loaded: usize,
    pub distinct_hashes: usize,
    /// Number of sketches a hash occurs in -> number of such hashes.
    pub histogram: BTreeMap<u32, usize>,
}

fn pass_progress(message: &str, locations: usize) -> ProgressBar {
    ProgressBarBuilder::new(message)
        .with_template(PASS_TEMPLATE)
        .with_length(locations as u64)
        .build()
}

fn location_summaries(outcome: &CountOutcome) -> Vec<LocationSummary> {
    outcome
        .per_location
        .iter()
        .map(|(location, sketches)| LocationSummary {
            location: location.clone(),
            sketches: *sketches,
        })
        .collect()
}

fn counting_pass<S>(source: &S, threads: usize) -> FilterResult<CountOutcome>
where
    S: SketchSource + ?Sized,
{
    let progress = pass_progress("Counting hashes", source.locations().len());
    let outcome = count_hashes(source, threads, &progress)?;
    progress.finish_and_clear();

    info!(
        "Loaded {} hashes from {} sketches in {} locations.",
        outcome.table.len(),
        outcome.table.sketches_counted(),
        outcome.per_location.len()
    );
    Ok(outcome)
}

/// Keeps only hashes shared by enough sketches, writing one filtered sketch per input sketch.
///
/// The sink is opened before any input is read so an unusable destination
/// fails immediately. Every location is then read twice: once to count hash
/// occurrences, once to filter.
pub fn run<S, K>(source: &S, sink: &mut K, options: &FilterOptions) -> FilterResult<FilterSummary>
where
    S: SketchSource + ?Sized,
    K: SketchSink + ?Sized,
{
    if source.locations().is_empty() {
        return Err(FilterError::InvalidParameter(
            "at least one input location is required".to_string(),
        ));
    }

    sink.open()?;

    let outcome = counting_pass(source, options.threads)?;
    let retain = RetainSet::build(&outcome.table, &options.rule);
    info!(
        "Of {} hashes, keeping {} that are {}.",
        outcome.table.len(),
        retain.len(),
        options.rule
    );

    let progress = pass_progress("Filtering sketches", source.locations().len());
    for (location, expected) in &outcome.per_location {
        let sketches = source
            .load(location)
            .map_err(|e| FilterError::SourceUnavailable {
                location: location.clone(),
                pass: Pass::Filtering,
                source: e,
            })?;

        if sketches.len() != *expected {
            warn!(
                "{}: {} sketches on the second read, {} on the first",
                location.display(),
                sketches.len(),
                expected
            );
        }

        for sketch in &sketches {
            let filtered = filter_sketch(sketch, &retain)?;
            sink.add(&filtered)?;
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    sink.close()?;

    let summary = FilterSummary {
        rule: options.rule,
        locations: location_summaries(&outcome),
        sketches_loaded: outcome.table.sketches_counted(),
        distinct_hashes: outcome.table.len(),
        retained_hashes: retain.len(),
        sketches_written: sink.len(),
    };

    Ok(summary)
}

/// Pass 1 only: how many hashes occur in how many sketches.
pub fn occurrence<S>(source: &S, threads: usize) -> FilterResult<OccurrenceSummary>
where
    S: SketchSource + ?Sized,
{
    let outcome = counting_pass(source, threads)?;

    Ok(OccurrenceSummary {
        locations: location_summaries(&outcome),
        sketches_loaded: outcome.table.sketches_counted(),
        distinct_hashes: outcome.table.len(),
        histogram: outcome.table.occurrence_histogram(),
    })
}
