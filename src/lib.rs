//! Requirements-traceability packaging hooks for Rust build pipelines.
//!
//! This crate wires the reqstool packaging core into a build-tool lifecycle:
//! a decorator-processor seam that generates the annotations manifest, a
//! `BuildHook` ABI with two registered hooks (`reqstool` and
//! `reqstool_decorators`), and the plugin configuration read from the
//! component's `Cargo.toml` metadata or a standalone TOML file.

pub mod config;
pub mod decorators;
pub mod hook;

pub use config::{ComponentMetadata, ConfigError, Mode, PluginConfig};
pub use decorators::{CommandProcessor, DecoratorProcessor, ProcessorError};
pub use hook::{
    hook_by_name, BuildContext, BuildHook, DecoratorsHook, HookError, HookPhase, ReqstoolHook,
};
