//! TOML configuration file and flag precedence.
//!
//! Values come from three layers: command-line flags, then the config file,
//! then built-in defaults. The file is `--config PATH`, or `fieldcheck.toml`
//! in the working directory when it exists.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use tracing::debug;

use fieldcheck_map::{
    DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT, DEFAULT_FUZZY_THRESHOLD, DEFAULT_MODEL, EmbeddingConfig,
    SemanticMode,
};

pub const DEFAULT_CONFIG_FILE: &str = "fieldcheck.toml";
pub const DEFAULT_API_KEY_ENV: &str = "FIELDCHECK_EMBEDDING_API_KEY";
pub const DEFAULT_OUTPUT_DIR: &str = "fieldcheck-output";
pub const DEFAULT_DIAGNOSTICS_FILE: &str = "bad_regex_patterns.csv";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MAX_RETRIES: u32 = 2;

/// Parsed config file. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub binding: BindingSection,
    pub embedding: EmbeddingSection,
    pub output: OutputSection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BindingSection {
    pub threshold: Option<f32>,
    pub semantic: Option<SemanticMode>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EmbeddingSection {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: Option<String>,
    pub batch_size: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputSection {
    pub dir: Option<PathBuf>,
    pub diagnostics: Option<PathBuf>,
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub threshold: Option<f32>,
    pub semantic: Option<SemanticMode>,
    pub output_dir: Option<PathBuf>,
}

/// Effective settings after applying every layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub threshold: f32,
    pub semantic: SemanticMode,
    pub embedding: EmbeddingSettings,
    pub output_dir: PathBuf,
    pub diagnostics: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingSettings {
    pub endpoint: String,
    pub model: String,
    pub api_key_env: String,
    pub batch_size: usize,
    pub timeout: Duration,
    pub max_retries: u32,
}

impl FileConfig {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("parse config {}", path.display()))
    }

    /// Load `explicit`, or the default file in `dir` when present.
    ///
    /// An explicit path must exist; a missing default file yields the empty
    /// config.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let default_path = dir.join(DEFAULT_CONFIG_FILE);
        if default_path.is_file() {
            debug!(path = %default_path.display(), "using default config file");
            return Self::load(&default_path);
        }
        Ok(Self::default())
    }

    /// Apply `overrides` on top of this file and the defaults.
    pub fn resolve(&self, overrides: &Overrides) -> Result<Settings> {
        let threshold = overrides
            .threshold
            .or(self.binding.threshold)
            .unwrap_or(DEFAULT_FUZZY_THRESHOLD);
        if !(0.0..=1.0).contains(&threshold) {
            bail!("binding threshold must be between 0 and 1, got {threshold}");
        }
        let embedding = &self.embedding;
        let batch_size = embedding.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            bail!("embedding batch_size must be at least 1");
        }
        Ok(Settings {
            threshold,
            semantic: overrides
                .semantic
                .or(self.binding.semantic)
                .unwrap_or_default(),
            embedding: EmbeddingSettings {
                endpoint: embedding
                    .endpoint
                    .clone()
                    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
                model: embedding
                    .model
                    .clone()
                    .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
                api_key_env: embedding
                    .api_key_env
                    .clone()
                    .unwrap_or_else(|| DEFAULT_API_KEY_ENV.to_string()),
                batch_size,
                timeout: Duration::from_secs(
                    embedding.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
                ),
                max_retries: embedding.max_retries.unwrap_or(DEFAULT_MAX_RETRIES),
            },
            output_dir: overrides
                .output_dir
                .clone()
                .or_else(|| self.output.dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            diagnostics: self
                .output
                .diagnostics
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DIAGNOSTICS_FILE)),
        })
    }
}

impl EmbeddingSettings {
    /// Client config with the API key read from the configured variable.
    pub fn client_config(&self) -> EmbeddingConfig {
        let api_key = std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            debug!(variable = %self.api_key_env, "no embedding API key set");
        }
        EmbeddingConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            api_key,
            batch_size: self.batch_size,
            timeout: self.timeout,
            max_retries: self.max_retries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_file_or_flags() {
        let settings = FileConfig::default()
            .resolve(&Overrides::default())
            .unwrap();
        assert_eq!(settings.threshold, DEFAULT_FUZZY_THRESHOLD);
        assert_eq!(settings.semantic, SemanticMode::Off);
        assert_eq!(settings.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(settings.diagnostics, PathBuf::from(DEFAULT_DIAGNOSTICS_FILE));
        assert_eq!(settings.embedding.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(settings.embedding.timeout, Duration::from_secs(30));
        assert_eq!(settings.embedding.max_retries, 2);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(FileConfig::from_toml("[binding]\nthreshhold = 0.5\n").is_err());
    }

    #[test]
    fn zero_batch_size_is_rejected() {
        let config = FileConfig::from_toml("[embedding]\nbatch_size = 0\n").unwrap();
        assert!(config.resolve(&Overrides::default()).is_err());
    }
}
