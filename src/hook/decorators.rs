//! The `reqstool_decorators` hook: annotations manifest only.

use tracing::info;

use crate::config::PluginConfig;
use crate::decorators::{CommandProcessor, DecoratorProcessor};

use super::{names, BuildContext, BuildHook, HookError, HookPhase};

/// Build hook that only runs the decorator processor; finalize is a no-op.
pub struct DecoratorsHook {
    config: PluginConfig,
    phase: HookPhase,
    processor: Box<dyn DecoratorProcessor>,
}

impl DecoratorsHook {
    pub fn new(config: PluginConfig) -> Self {
        let processor = Box::new(CommandProcessor::new(&config.processor));
        Self::with_processor(config, processor)
    }

    /// Construct with a custom processor implementation (used by tests).
    pub fn with_processor(config: PluginConfig, processor: Box<dyn DecoratorProcessor>) -> Self {
        Self {
            config,
            phase: HookPhase::Uninitialized,
            processor,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> HookPhase {
        self.phase
    }
}

impl BuildHook for DecoratorsHook {
    fn name(&self) -> &'static str {
        names::REQSTOOL_DECORATORS
    }

    fn initialize(&mut self, ctx: &mut BuildContext) -> Result<(), HookError> {
        self.phase.transition(HookPhase::Initialized)?;

        info!(build_target = %ctx.target, "reqstool_decorators plugin loaded");

        self.processor
            .process(&self.config.sources, &self.config.output_directory)?;

        Ok(())
    }
}
