//! `speclink.toml` project configuration.
//!
//! Precedence: command-line flags, then the nearest `speclink.toml`
//! found by walking up from the working directory, then built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use speclink_compose::{MergeStrategy, ResolveOptions};
use speclink_model::DocumentFormat;

/// File name searched for.
pub const CONFIG_FILE: &str = "speclink.toml";

/// The top-level configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpeclinkConfig {
    /// Resolution defaults.
    #[serde(default)]
    pub resolve: ResolveConfig,
    /// Output defaults.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[resolve]` section. Unset keys fall back to library defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolveConfig {
    #[serde(default)]
    pub max_depth: Option<usize>,
    #[serde(default)]
    pub allow_circular: Option<bool>,
    #[serde(default)]
    pub merge_strategy: Option<MergeStrategy>,
    #[serde(default)]
    pub validate_consistency: Option<bool>,
    #[serde(default)]
    pub max_errors: Option<usize>,
}

/// `[output]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default rendering format: yaml, json or toml.
    #[serde(default)]
    pub format: Option<String>,
}

/// Flag values that override the configuration file.
#[derive(Debug, Clone, Default)]
pub struct ResolveOverrides {
    pub max_depth: Option<usize>,
    pub allow_circular: Option<bool>,
    pub strategy: Option<MergeStrategy>,
    pub no_consistency: bool,
    pub max_errors: Option<usize>,
}

impl SpeclinkConfig {
    /// Search upward from `start_dir` for a `speclink.toml` file, parse and
    /// return it along with the directory it was found in.
    pub fn find_and_load(start_dir: &Path) -> Result<Option<(Self, PathBuf)>> {
        let mut dir = start_dir.to_path_buf();
        loop {
            let candidate = dir.join(CONFIG_FILE);
            if candidate.is_file() {
                let content = std::fs::read_to_string(&candidate)
                    .with_context(|| format!("reading {}", candidate.display()))?;
                let config: SpeclinkConfig = toml::from_str(&content)
                    .with_context(|| format!("parsing {}", candidate.display()))?;
                tracing::debug!(path = %candidate.display(), "loaded configuration");
                return Ok(Some((config, dir)));
            }
            if !dir.pop() {
                break;
            }
        }
        Ok(None)
    }

    /// Load the nearest configuration, or defaults when there is none.
    pub fn load_or_default(start_dir: &Path) -> Result<Self> {
        Ok(Self::find_and_load(start_dir)?
            .map(|(config, _)| config)
            .unwrap_or_default())
    }

    /// Build resolver options from file values and flag overrides.
    pub fn resolve_options(&self, overrides: &ResolveOverrides) -> ResolveOptions {
        let file = &self.resolve;
        let mut options = ResolveOptions::default();

        if let Some(depth) = overrides.max_depth.or(file.max_depth) {
            options.max_depth = depth;
        }
        options.allow_circular = overrides
            .allow_circular
            .or(file.allow_circular)
            .unwrap_or(false);
        if let Some(strategy) = overrides.strategy.or(file.merge_strategy) {
            options.merge_strategy = strategy;
        }
        options.validate_consistency =
            !overrides.no_consistency && file.validate_consistency.unwrap_or(true);
        options.max_errors = overrides.max_errors.or(file.max_errors);
        options
    }

    /// The output format: the flag value, the configured value, or YAML.
    pub fn output_format(&self, flag: Option<&str>) -> Result<DocumentFormat> {
        match flag.or(self.output.format.as_deref()) {
            Some(name) => name
                .parse()
                .with_context(|| format!("invalid output format '{name}'")),
            None => Ok(DocumentFormat::Yaml),
        }
    }
}
