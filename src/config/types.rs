use crate::batch::Strategy;
use crate::index::IndexConfig;
use serde::{Deserialize, Serialize};

/// Contents of `copycat.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub index: IndexConfig,
    #[serde(default)]
    pub batch: BatchSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSettings {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_cluster_threshold")]
    pub cluster_threshold: f64,
    #[serde(default = "default_true")]
    pub parallel: bool,
    /// Overrides extension-based detection when set.
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            cluster_threshold: default_cluster_threshold(),
            parallel: true,
            language: None,
            max_file_bytes: default_max_file_bytes(),
            extensions: default_extensions(),
        }
    }
}

const fn default_true() -> bool { true }
const fn default_cluster_threshold() -> f64 { 0.75 }
// 16 MiB
const fn default_max_file_bytes() -> u64 { 16 * 1024 * 1024 }

fn default_extensions() -> Vec<String> {
    ["py", "java", "js", "cpp", "c", "h", "txt"]
        .iter()
        .map(|s| (*s).to_string())
        .collect()
}
