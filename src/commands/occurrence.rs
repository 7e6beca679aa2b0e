use crate::config::Config;
use crate::export::formats::occurrence::OccurrenceExport;
use crate::export::{ReportData, RunReport};
use crate::filter;
use crate::sketch::SignatureFileSource;
use crate::types::{MoleculeType, Selection};
use anyhow::Result;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::info;

pub fn run(
    sigfiles: Vec<PathBuf>,
    ksize: Option<u32>,
    molecule: Option<MoleculeType>,
    threads: Option<usize>,
    output: Option<PathBuf>,
    config: &Config,
) -> Result<()> {
    let selection = Selection::new(
        ksize.unwrap_or(config.ksize),
        molecule.unwrap_or(config.molecule),
    );
    info!("Selecting {}", selection);

    let source = SignatureFileSource::new(sigfiles, selection);
    let summary = filter::occurrence(&source, threads.unwrap_or(config.threads))?;

    match output {
        Some(path) => {
            let export = OccurrenceExport::new(selection, &summary);
            RunReport::new(ReportData::Occurrence(export)).write_to(&path)?;
            info!("Wrote occurrence report to {}", path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut out = stdout.lock();
            writeln!(out, "samples\thashes")?;
            for (samples, hashes) in &summary.histogram {
                writeln!(out, "{}\t{}", samples, hashes)?;
            }
            out.flush()?;
        }
    }

    Ok(())
}
