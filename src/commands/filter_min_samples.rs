use crate::config::Config;
use crate::export::formats::filter::FilterExport;
use crate::export::{ReportData, RunReport};
use crate::filter::{self, FilterOptions, ThresholdRule};
use crate::sketch::{SignatureFileSink, SignatureFileSource};
use crate::types::{MoleculeType, Selection};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

pub struct FilterMinSamplesArgs {
    pub sigfiles: Vec<PathBuf>,
    pub output: String,
    pub ksize: Option<u32>,
    pub molecule: Option<MoleculeType>,
    pub min_samples: Option<u32>,
    pub max_samples: Option<u32>,
    pub threads: Option<usize>,
    pub report: Option<PathBuf>,
}

pub fn run(args: FilterMinSamplesArgs, config: &Config) -> Result<()> {
    let selection = Selection::new(
        args.ksize.unwrap_or(config.ksize),
        args.molecule.unwrap_or(config.molecule),
    );
    let rule = ThresholdRule::new(
        args.min_samples.unwrap_or(config.min_samples),
        args.max_samples.or(config.max_samples),
    )?;
    let options = FilterOptions {
        rule,
        threads: args.threads.unwrap_or(config.threads),
    };

    info!("Selecting {}", selection);

    let source = SignatureFileSource::new(args.sigfiles, selection);
    let mut sink = SignatureFileSink::new(&args.output);
    let summary = filter::run(&source, &mut sink, &options)
        .with_context(|| format!("Filtering into '{}' failed", args.output))?;

    info!(
        "Saved {} signatures to '{}'",
        summary.sketches_written, args.output
    );

    if let Some(report_path) = args.report {
        let export = FilterExport::new(selection, &args.output, &summary);
        RunReport::new(ReportData::FilterMinSamples(export)).write_to(&report_path)?;
        info!("Wrote run report to {}", report_path.display());
    }

    Ok(())
}
