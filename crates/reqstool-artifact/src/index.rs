//! The reqstool index document (reqstool_index.yml).
//!
//! A small descriptor spliced into the primary artifact that points downstream
//! tooling at the traceability resources bundled alongside it.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::layout::ResourceLayout;

/// Published JSON schema the serialized document references on its first line.
pub const INDEX_SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/Luftfartsverket/reqstool-client/main/src/reqstool/resources/schemas/v1/reqstool_index.schema.json";

/// Language tag recorded in the index document.
pub const LANGUAGE_TAG: &str = "rust";

/// Build-tool tag recorded in the index document.
pub const BUILD_TAG: &str = "cargo";

/// Errors for index document operations
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Paths to traceability resources, relative to the build root.
///
/// Absent resources are omitted from the serialized document entirely;
/// `test_results` is always a sequence, even with a single report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePaths {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub software_verification_cases: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub manual_verification_results: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotations: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub test_results: Vec<String>,
}

/// The index document spliced into the primary artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Language tag (always `rust`)
    pub language: String,

    /// Build-tool tag (always `cargo`)
    pub build: String,

    /// Component version from host metadata
    pub version: String,

    /// Mapping of logical resource names to their paths
    pub resources: ResourcePaths,
}

impl IndexDocument {
    /// Create an index document for the given component version.
    pub fn new(version: &str, resources: ResourcePaths) -> Self {
        Self {
            language: LANGUAGE_TAG.to_string(),
            build: BUILD_TAG.to_string(),
            version: version.to_string(),
            resources,
        }
    }

    /// Collect resource paths from disk, listing only files that exist.
    ///
    /// `dataset_dir` holds the hand-written files named by `layout`,
    /// `output_dir` holds the generated annotations manifest, and
    /// `junit_xml_file` is the configured test-execution report.
    pub fn collect(
        version: &str,
        layout: &ResourceLayout,
        dataset_dir: &Path,
        output_dir: &Path,
        junit_xml_file: &Path,
    ) -> Self {
        let existing = |path: std::path::PathBuf| -> Option<String> {
            path.exists().then(|| path.to_string_lossy().into_owned())
        };

        let resources = ResourcePaths {
            requirements: existing(dataset_dir.join(&layout.requirements_file)),
            software_verification_cases: existing(
                dataset_dir.join(&layout.verification_cases_file),
            ),
            manual_verification_results: existing(dataset_dir.join(&layout.manual_results_file)),
            annotations: existing(output_dir.join(&layout.annotations_file)),
            test_results: existing(junit_xml_file.to_path_buf())
                .into_iter()
                .collect(),
        };

        Self::new(version, resources)
    }

    /// Serialize to YAML, preceded by the schema-reference comment line.
    pub fn to_yaml(&self) -> Result<String, IndexError> {
        let body = serde_yaml::to_string(self)?;
        Ok(format!(
            "# yaml-language-server: $schema={}\n{}",
            INDEX_SCHEMA_URL, body
        ))
    }

    /// Parse from YAML; the leading schema comment is ignored by the parser.
    pub fn from_yaml(s: &str) -> Result<Self, IndexError> {
        Ok(serde_yaml::from_str(s)?)
    }
}
