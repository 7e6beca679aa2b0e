use crate::types::MoleculeType;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML file with default option values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Keep only hashes present in a minimum number of sketches
    FilterMinSamples {
        /// Signature files or directories of signature files
        #[arg(required = true)]
        sigfiles: Vec<PathBuf>,

        /// Output signature file ('-' for stdout, '.gz' to compress)
        #[arg(short = 'o', long = "output")]
        output: String,

        /// K-mer size to select (default: 31)
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u32).range(1..))]
        ksize: Option<u32>,

        /// Molecule type to select (default: dna)
        #[arg(long, value_enum)]
        molecule: Option<MoleculeType>,

        /// Minimum number of sketches a hash must occur in (default: 2)
        #[arg(short = 'm', long, value_parser = clap::value_parser!(u32).range(1..))]
        min_samples: Option<u32>,

        /// Maximum number of sketches a hash may occur in
        #[arg(short = 'M', long, value_parser = clap::value_parser!(u32).range(1..))]
        max_samples: Option<u32>,

        /// Worker threads for the counting pass (default: 1)
        #[arg(short = 't', long)]
        threads: Option<usize>,

        /// Write a JSON run report to this file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Summarize in how many sketches each hash occurs
    Occurrence {
        /// Signature files or directories of signature files
        #[arg(required = true)]
        sigfiles: Vec<PathBuf>,

        /// K-mer size to select (default: 31)
        #[arg(short = 'k', long, value_parser = clap::value_parser!(u32).range(1..))]
        ksize: Option<u32>,

        /// Molecule type to select (default: dna)
        #[arg(long, value_enum)]
        molecule: Option<MoleculeType>,

        /// Worker threads (default: 1)
        #[arg(short = 't', long)]
        threads: Option<usize>,

        /// Write the histogram as a JSON report instead of a table
        #[arg(short = 'o', long = "output")]
        output: Option<PathBuf>,
    },
}
