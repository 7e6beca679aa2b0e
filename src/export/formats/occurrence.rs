use super::filter::InputStatistics;
use crate::filter::OccurrenceSummary;
use crate::types::Selection;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct OccurrenceExport {
    pub selection: Selection,
    pub sketches_loaded: usize,
    pub distinct_hashes: usize,
    pub histogram: Vec<OccurrenceBin>,
    pub inputs: Vec<InputStatistics>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OccurrenceBin {
    pub samples: u32,
    pub hashes: usize,
}

impl OccurrenceExport {
    pub fn new(selection: Selection, summary: &OccurrenceSummary) -> Self {
        Self {
            selection,
            sketches_loaded: summary.sketches_loaded,
            distinct_hashes: summary.distinct_hashes,
            histogram: summary
                .histogram
                .iter()
                .map(|(&samples, &hashes)| OccurrenceBin { samples, hashes })
                .collect(),
            inputs: summary.locations.iter().map(InputStatistics::from).collect(),
        }
    }
}
