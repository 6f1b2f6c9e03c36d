//! Plugin configuration ([package.metadata.reqstool] or standalone TOML).
//!
//! The configuration is read once per invocation and immutable afterwards.
//! Component name and version come from the same manifest's `[package]` table;
//! a missing version falls back to the literal `unknown` rather than failing.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Placeholder used when version metadata is unavailable.
pub const VERSION_PLACEHOLDER: &str = "unknown";

/// Error types for config operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Which archive variant the reqstool hook runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Assemble a standalone `<name>-<version>-reqstool.tar.gz` at initialize
    #[default]
    Standalone,
    /// Splice the index document into the primary artifact at finalize
    Splice,
}

/// Plugin configuration, one per invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Source roots scanned for traceability decorators
    #[serde(default, alias = "path")]
    pub sources: Vec<PathBuf>,

    /// Directory of hand-written traceability files
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Where generated files land, including the annotations manifest
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,

    /// Test-execution report consumed as `test_results`
    #[serde(default = "default_junit_xml_file")]
    pub junit_xml_file: PathBuf,

    /// Override of the standalone archive file name
    pub archive_name: Option<String>,

    /// Archive variant
    #[serde(default)]
    pub mode: Mode,

    /// Archive the whole dataset directory instead of the fixed-name files
    #[serde(default)]
    pub bundle_dataset_tree: bool,

    /// External decorator-processor command
    #[serde(default = "default_processor")]
    pub processor: String,
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("reqstool")
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("build/reqstool")
}

fn default_junit_xml_file() -> PathBuf {
    PathBuf::from("build/junit.xml")
}

fn default_processor() -> String {
    "reqstool-decorators".to_string()
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            sources: Vec::new(),
            dataset_path: default_dataset_path(),
            output_directory: default_output_directory(),
            junit_xml_file: default_junit_xml_file(),
            archive_name: None,
            mode: Mode::default(),
            bundle_dataset_tree: false,
            processor: default_processor(),
        }
    }
}

impl PluginConfig {
    /// Load and parse config from a standalone TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Parse config from a TOML string
    pub fn from_str(s: &str) -> Result<Self, ConfigError> {
        let config: PluginConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processor.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "'processor' must not be empty".to_string(),
            ));
        }

        if self.dataset_path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "'dataset_path' must not be empty".to_string(),
            ));
        }

        if self.output_directory.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "'output_directory' must not be empty".to_string(),
            ));
        }

        for source in &self.sources {
            if source.as_os_str().is_empty() {
                return Err(ConfigError::ValidationError(
                    "'sources' entries must not be empty".to_string(),
                ));
            }
        }

        if let Some(ref name) = self.archive_name {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "'archive_name' must not be empty when set".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Path of the generated annotations manifest
    pub fn annotations_path(&self, annotations_file: &str) -> PathBuf {
        self.output_directory.join(annotations_file)
    }
}

/// Component name and version from host metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentMetadata {
    pub name: String,
    pub version: String,
}

/// Load component metadata and plugin config from a Cargo.toml.
///
/// The plugin config lives under `[package.metadata.reqstool]`; a manifest
/// without that table yields the defaults.
pub fn load_from_manifest(path: &Path) -> Result<(ComponentMetadata, PluginConfig), ConfigError> {
    let contents = fs::read_to_string(path)?;
    parse_manifest(&contents)
}

/// Parse component metadata and plugin config from Cargo.toml contents.
pub fn parse_manifest(contents: &str) -> Result<(ComponentMetadata, PluginConfig), ConfigError> {
    let value: toml::Value = toml::from_str(contents)?;

    let package = value.get("package").ok_or_else(|| {
        ConfigError::ValidationError("manifest has no [package] table".to_string())
    })?;

    let name = package
        .get("name")
        .and_then(|n| n.as_str())
        .ok_or_else(|| {
            ConfigError::ValidationError("manifest has no package name".to_string())
        })?
        .to_string();

    let version = package
        .get("version")
        .and_then(|v| v.as_str())
        .unwrap_or(VERSION_PLACEHOLDER)
        .to_string();

    let config = match package
        .get("metadata")
        .and_then(|m| m.get("reqstool"))
    {
        Some(table) => {
            let config: PluginConfig = table.clone().try_into()?;
            config.validate()?;
            config
        }
        None => PluginConfig::default(),
    };

    Ok((ComponentMetadata { name, version }, config))
}
