pub mod filter;
pub mod occurrence;
