use crate::sketch::Sketch;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoleculeType {
    #[default]
    #[value(name = "dna")]
    #[serde(rename = "DNA", alias = "dna")]
    Dna,
    #[value(name = "protein")]
    #[serde(rename = "protein")]
    Protein,
    #[value(name = "dayhoff")]
    #[serde(rename = "dayhoff")]
    Dayhoff,
    #[value(name = "hp")]
    #[serde(rename = "hp")]
    Hp,
    #[value(name = "skipm1n3")]
    #[serde(rename = "skipm1n3")]
    Skipm1n3,
    #[value(name = "skipm2n3")]
    #[serde(rename = "skipm2n3")]
    Skipm2n3,
}

impl MoleculeType {
    /// Name as written in the `molecule` field of a signature file.
    pub fn as_str(&self) -> &'static str {
        match self {
            MoleculeType::Dna => "DNA",
            MoleculeType::Protein => "protein",
            MoleculeType::Dayhoff => "dayhoff",
            MoleculeType::Hp => "hp",
            MoleculeType::Skipm1n3 => "skipm1n3",
            MoleculeType::Skipm2n3 => "skipm2n3",
        }
    }

    /// Protein alphabets record `3 * k` in the stored ksize.
    pub fn is_protein_alphabet(&self) -> bool {
        matches!(
            self,
            MoleculeType::Protein | MoleculeType::Dayhoff | MoleculeType::Hp
        )
    }

    pub fn stored_ksize(&self, ksize: u32) -> u32 {
        if self.is_protein_alphabet() {
            ksize * 3
        } else {
            ksize
        }
    }

    pub fn user_ksize(&self, stored: u32) -> u32 {
        if self.is_protein_alphabet() {
            stored / 3
        } else {
            stored
        }
    }
}

impl fmt::Display for MoleculeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MoleculeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "dna" => Ok(MoleculeType::Dna),
            "protein" => Ok(MoleculeType::Protein),
            "dayhoff" => Ok(MoleculeType::Dayhoff),
            "hp" => Ok(MoleculeType::Hp),
            "skipm1n3" => Ok(MoleculeType::Skipm1n3),
            "skipm2n3" => Ok(MoleculeType::Skipm2n3),
            other => Err(format!("unknown molecule type '{}'", other)),
        }
    }
}

/// The (k-mer size, molecule) pair a run is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub ksize: u32,
    pub molecule: MoleculeType,
}

impl Selection {
    pub fn new(ksize: u32, molecule: MoleculeType) -> Self {
        Self { ksize, molecule }
    }

    pub fn matches(&self, sketch: &Sketch) -> bool {
        sketch.molecule() == self.molecule
            && sketch.stored_ksize() == self.molecule.stored_ksize(self.ksize)
    }
}

impl Default for Selection {
    fn default() -> Self {
        Self::new(31, MoleculeType::Dna)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "k={}, {}", self.ksize, self.molecule)
    }
}
