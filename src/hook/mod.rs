//! Build-hook ABI and lifecycle phase machine.
//!
//! The host build tool calls back into a registered hook at two points:
//! `initialize` before the primary artifact is created and `finalize` after.
//! Hook instances move `Uninitialized → Initialized → Finalized` and are
//! discarded after one build.

mod decorators;
mod reqstool;

pub use decorators::DecoratorsHook;
pub use reqstool::ReqstoolHook;

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};

use crate::config::{ComponentMetadata, ConfigError, PluginConfig};
use crate::decorators::ProcessorError;
use reqstool_artifact::{ArchiveError, AssembleReport, IndexError, SpliceError};

/// Registered hook names.
pub mod names {
    pub const REQSTOOL: &str = "reqstool";
    pub const REQSTOOL_DECORATORS: &str = "reqstool_decorators";
}

/// Lifecycle phase of a hook instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookPhase {
    Uninitialized,
    Initialized,
    Finalized,
}

impl HookPhase {
    /// Check if transition from this phase to target is valid
    pub fn can_transition_to(&self, target: HookPhase) -> bool {
        matches!(
            (self, target),
            (HookPhase::Uninitialized, HookPhase::Initialized)
                | (HookPhase::Initialized, HookPhase::Finalized)
        )
    }

    /// Transition to the target phase, rejecting out-of-order calls.
    pub fn transition(&mut self, target: HookPhase) -> Result<(), HookError> {
        if !self.can_transition_to(target) {
            return Err(HookError::InvalidPhase {
                from: *self,
                to: target,
            });
        }
        *self = target;
        Ok(())
    }
}

/// Errors for hook operations
#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("Invalid phase transition from {from:?} to {to:?}")]
    InvalidPhase { from: HookPhase, to: HookPhase },

    #[error("Unknown hook: {0}")]
    UnknownHook(String),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("decorator processor error: {0}")]
    Processor(#[from] ProcessorError),

    #[error("archive error: {0}")]
    Archive(#[from] ArchiveError),

    #[error("splice error: {0}")]
    Splice(#[from] SpliceError),

    #[error("index error: {0}")]
    Index(#[from] IndexError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl HookError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            HookError::InvalidPhase { .. } => 40,
            HookError::UnknownHook(_) => 2,
            HookError::Config(_) => 1,
            HookError::Processor(_) => 10,
            HookError::Archive(_) => 92,
            HookError::Splice(_) => 93,
            HookError::Index(_) => 1,
            HookError::Io(_) => 1,
        }
    }
}

/// Per-build context handed to hooks by the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildContext {
    /// Component name and version from host metadata
    pub metadata: ComponentMetadata,

    /// Host build-target tag (e.g. `sdist`)
    pub target: String,

    /// Artifact paths the hooks produced, reported back to the host
    pub artifacts: Vec<PathBuf>,

    /// Assembly reports for produced archives
    pub reports: Vec<AssembleReport>,
}

impl BuildContext {
    pub fn new(metadata: ComponentMetadata, target: &str) -> Self {
        Self {
            metadata,
            target: target.to_string(),
            artifacts: Vec::new(),
            reports: Vec::new(),
        }
    }
}

/// The lifecycle-hook ABI the host calls into.
pub trait BuildHook {
    /// Registered hook name
    fn name(&self) -> &'static str;

    /// Called before the primary artifact is created
    fn initialize(&mut self, ctx: &mut BuildContext) -> Result<(), HookError>;

    /// Called after the primary artifact is created
    fn finalize(&mut self, _ctx: &mut BuildContext, _artifact: &Path) -> Result<(), HookError> {
        Ok(())
    }
}

/// Look up a registered hook by name.
pub fn hook_by_name(name: &str, config: PluginConfig) -> Result<Box<dyn BuildHook>, HookError> {
    match name {
        names::REQSTOOL => Ok(Box::new(ReqstoolHook::new(config))),
        names::REQSTOOL_DECORATORS => Ok(Box::new(DecoratorsHook::new(config))),
        other => Err(HookError::UnknownHook(other.to_string())),
    }
}
