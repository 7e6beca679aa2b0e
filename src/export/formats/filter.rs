use crate::filter::{FilterSummary, LocationSummary};
use crate::types::Selection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterExport {
    pub parameters: FilterParameters,
    pub statistics: FilterStatistics,
    pub inputs: Vec<InputStatistics>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterParameters {
    pub selection: Selection,
    pub min_samples: u32,
    pub max_samples: Option<u32>,
    pub output: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct FilterStatistics {
    pub sketches_loaded: usize,
    pub distinct_hashes: usize,
    pub retained_hashes: usize,
    pub sketches_written: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InputStatistics {
    pub location: String,
    pub sketches: usize,
}

impl From<&LocationSummary> for InputStatistics {
    fn from(summary: &LocationSummary) -> Self {
        Self {
            location: summary.location.display().to_string(),
            sketches: summary.sketches,
        }
    }
}

impl FilterExport {
    pub fn new(selection: Selection, output: &str, summary: &FilterSummary) -> Self {
        Self {
            parameters: FilterParameters {
                selection,
                min_samples: summary.rule.min_samples,
                max_samples: summary.rule.max_samples,
                output: output.to_string(),
            },
            statistics: FilterStatistics {
                sketches_loaded: summary.sketches_loaded,
                distinct_hashes: summary.distinct_hashes,
                retained_hashes: summary.retained_hashes,
                sketches_written: summary.sketches_written,
            },
            inputs: summary.locations.iter().map(InputStatistics::from).collect(),
        }
    }
}
