//! # Configuration
//!
//! Run configuration loaded from YAML. Every section carries defaults, so an
//! empty document is a valid configuration:
//!
//! ```yaml
//! logger:
//!   level: info
//!   format: compact
//! resources:
//!   - prefix: mondo
//!     version: "2025-03-04"
//!   - prefix: orphanet
//!     version: "4.6"
//!     secondary: orphanet.ordo
//! synthesis:
//!   max_distance: 3
//!   max_relations: 3
//!   seed: 7
//! inference:
//!   edit_cutoff: 0.5
//! reconcile:
//!   output_dir: output/reconcile
//!   dated: true
//! ```
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::logger::LoggerConfig;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub logger: LoggerConfig,
    /// Ontologies taking part in the run, in pairing order.
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
    #[serde(default)]
    pub synthesis: SynthesisConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
}

/// One ontology snapshot taking part in the run.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResourceConfig {
    pub prefix: String,
    #[serde(default)]
    pub version: Option<String>,
    /// Namespace consulted for labels the primary table lacks
    /// (e.g. `orphanet.ordo` for `orphanet`).
    #[serde(default)]
    pub secondary: Option<String>,
}

impl ResourceConfig {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            version: None,
            secondary: None,
        }
    }

    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, namespace: impl Into<String>) -> Self {
        self.secondary = Some(namespace.into());
        self
    }
}

/// Parameters of relation context extraction and training synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SynthesisConfig {
    /// Maximum number of hops when looking for related terms.
    #[serde(default = "default_max_distance")]
    pub max_distance: usize,
    /// Maximum number of named related terms kept per context list.
    #[serde(default = "default_max_relations")]
    pub max_relations: usize,
    /// Store the similarity as `LOW`/`MEDIUM`/`HIGH` instead of the raw score.
    #[serde(default = "default_true")]
    pub bin_similarity: bool,
    /// Seed for the training order shuffle. OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            max_distance: default_max_distance(),
            max_relations: default_max_relations(),
            bin_similarity: true,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct InferenceConfig {
    /// Rows whose name similarity falls below this value are dropped.
    #[serde(default)]
    pub edit_cutoff: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconcileConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Write reports into a `YYYY_MM_DD` sub directory.
    #[serde(default)]
    pub dated: bool,
    /// Mirror every evidence row before reconciling.
    #[serde(default = "default_true")]
    pub undirected_evidence: bool,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            dated: false,
            undirected_evidence: true,
        }
    }
}

fn default_max_distance() -> usize {
    3
}

fn default_max_relations() -> usize {
    3
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output").join("reconcile")
}

impl Config {
    /// Reads and parses a YAML configuration file.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        content.parse()
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(s)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read configuration `{path}`: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_yaml::Error),
}
