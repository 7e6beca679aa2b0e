pub mod filter_min_samples;
pub mod occurrence;
