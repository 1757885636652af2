// src/config/mod.rs
pub mod types;

pub use self::types::{BatchSettings, Config};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;

/// Default config file, looked up in the working directory.
pub const CONFIG_FILE: &str = "copycat.toml";

impl Config {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `path`, or `copycat.toml` when no path is given.
    ///
    /// A missing default file yields defaults; an explicit path must exist.
    ///
    /// # Errors
    /// Returns error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(p) => Self::load_file(p)?,
            None if Path::new(CONFIG_FILE).is_file() => Self::load_file(Path::new(CONFIG_FILE))?,
            None => Self::new(),
        };
        config.validate()?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse_toml(&content).with_context(|| format!("Invalid TOML in {}", path.display()))
    }

    /// Parses config text without validating it.
    ///
    /// # Errors
    /// Returns error on malformed TOML or mistyped fields.
    pub fn parse_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// # Errors
    /// Returns error if the index layout or a threshold is out of range.
    pub fn validate(&self) -> Result<()> {
        self.index.validate()?;
        if !(0.0..=1.0).contains(&self.batch.cluster_threshold) {
            bail!(
                "cluster_threshold {} is outside [0, 1]",
                self.batch.cluster_threshold
            );
        }
        if self.batch.extensions.is_empty() {
            bail!("at least one file extension must be configured");
        }
        Ok(())
    }
}
