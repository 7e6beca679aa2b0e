use crate::types::MoleculeType;
use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Defaults applied when an option is not given on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_ksize")]
    pub ksize: u32,

    #[serde(default)]
    pub molecule: MoleculeType,

    #[serde(default = "default_min_samples")]
    pub min_samples: u32,

    #[serde(default)]
    pub max_samples: Option<u32>,

    #[serde(default = "default_threads")]
    pub threads: usize,
}

fn default_ksize() -> u32 {
    31
}

fn default_min_samples() -> u32 {
    2
}

fn default_threads() -> usize {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ksize: default_ksize(),
            molecule: MoleculeType::default(),
            min_samples: default_min_samples(),
            max_samples: None,
            threads: default_threads(),
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "sketch-filter", "sketch-filter")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Reads the per-user config file, falling back to defaults when it is
    /// missing or unreadable.
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_path() {
            if config_path.exists() {
                match Self::load_from(&config_path) {
                    Ok(config) => return config,
                    Err(e) => warn!("ignoring config file: {:#}", e),
                }
            }
        }
        Config::default()
    }

    /// Reads an explicitly requested config file; any failure is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }
}
