//! The decorator-processor seam.
//!
//! Scanning annotated source for traceability data is delegated entirely to an
//! external collaborator, consumed through a single call: process the files
//! under the given paths and emit `annotations.yml` into the output directory.
//! The plugin never inspects the manifest's contents, only its path.

use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::info;

/// Errors for decorator processing
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("Failed to spawn decorator processor '{command}': {source}")]
    SpawnError {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Decorator processor exited with {status}")]
    ProcessorFailed { status: ExitStatus },

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// External collaborator contract: scan source roots, write the manifest.
///
/// Invoked exactly once per build, before any archive or splice step. Any
/// failure propagates as a fatal build error.
pub trait DecoratorProcessor {
    fn process(&self, sources: &[PathBuf], output_dir: &Path) -> Result<(), ProcessorError>;
}

/// Production implementation that shells out to the processor executable.
#[derive(Debug, Clone)]
pub struct CommandProcessor {
    command: String,
}

impl CommandProcessor {
    pub fn new(command: &str) -> Self {
        Self {
            command: command.to_string(),
        }
    }
}

impl DecoratorProcessor for CommandProcessor {
    fn process(&self, sources: &[PathBuf], output_dir: &Path) -> Result<(), ProcessorError> {
        std::fs::create_dir_all(output_dir)?;

        info!(command = %self.command, "parsing reqstool decorators");

        let status = Command::new(&self.command)
            .arg("--output-directory")
            .arg(output_dir)
            .args(sources)
            .status()
            .map_err(|e| ProcessorError::SpawnError {
                command: self.command.clone(),
                source: e,
            })?;

        if !status.success() {
            return Err(ProcessorError::ProcessorFailed { status });
        }

        info!(
            manifest = %output_dir.join("annotations.yml").display(),
            "generated annotations manifest"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_failure_names_command() {
        let processor = CommandProcessor::new("definitely-not-a-real-executable-7f3a");
        let dir = tempfile::TempDir::new().unwrap();
        let err = processor
            .process(&[PathBuf::from("src")], dir.path())
            .unwrap_err();

        match err {
            ProcessorError::SpawnError { command, .. } => {
                assert_eq!(command, "definitely-not-a-real-executable-7f3a");
            }
            other => panic!("Expected SpawnError, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_fatal() {
        let processor = CommandProcessor::new("false");
        let dir = tempfile::TempDir::new().unwrap();
        let err = processor.process(&[], dir.path()).unwrap_err();
        assert!(matches!(err, ProcessorError::ProcessorFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_successful_run_creates_output_dir() {
        let processor = CommandProcessor::new("true");
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("build/reqstool");
        processor.process(&[], &output).unwrap();
        assert!(output.is_dir());
    }
}
