//! Fixed file names for traceability resources.

use serde::{Deserialize, Serialize};

/// The fixed companion-file names the plugin packages.
///
/// Constructed once per invocation and passed explicitly to the assembler and
/// splicer, so tests can point the layout at temporary fixtures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceLayout {
    /// Hand-written requirements list
    #[serde(default = "default_requirements_file")]
    pub requirements_file: String,

    /// Hand-written software verification cases
    #[serde(default = "default_verification_cases_file")]
    pub verification_cases_file: String,

    /// Hand-written manual verification results
    #[serde(default = "default_manual_results_file")]
    pub manual_results_file: String,

    /// Generated annotations manifest
    #[serde(default = "default_annotations_file")]
    pub annotations_file: String,

    /// Index document entry name inside the primary artifact
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Archive subdirectory that groups test-execution reports
    #[serde(default = "default_test_results_dir")]
    pub test_results_dir: String,
}

fn default_requirements_file() -> String {
    "requirements.yml".to_string()
}

fn default_verification_cases_file() -> String {
    "software_verification_cases.yml".to_string()
}

fn default_manual_results_file() -> String {
    "manual_verification_results.yml".to_string()
}

fn default_annotations_file() -> String {
    "annotations.yml".to_string()
}

fn default_index_file() -> String {
    "reqstool_index.yml".to_string()
}

fn default_test_results_dir() -> String {
    "test_results".to_string()
}

impl Default for ResourceLayout {
    fn default() -> Self {
        Self {
            requirements_file: default_requirements_file(),
            verification_cases_file: default_verification_cases_file(),
            manual_results_file: default_manual_results_file(),
            annotations_file: default_annotations_file(),
            index_file: default_index_file(),
            test_results_dir: default_test_results_dir(),
        }
    }
}

impl ResourceLayout {
    /// The three hand-written dataset files, in packaging order.
    pub fn dataset_files(&self) -> [&str; 3] {
        [
            &self.requirements_file,
            &self.verification_cases_file,
            &self.manual_results_file,
        ]
    }
}
