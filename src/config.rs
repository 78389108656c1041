//! Runtime settings, optionally loaded from a JSON file.

use crate::Result;
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_DOWNSCALE_FACTOR: usize = 2;
pub const DEFAULT_REMAP_FACTOR: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Degree of parallelism; `None` means one worker per logical CPU.
    pub workers: Option<usize>,
    pub downscale_factor: usize,
    pub remap_factor: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            workers: None,
            downscale_factor: DEFAULT_DOWNSCALE_FACTOR,
            remap_factor: DEFAULT_REMAP_FACTOR,
        }
    }
}

impl Config {
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Resolved worker count, at least one.
    pub fn workers(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get).max(1)
    }
}
