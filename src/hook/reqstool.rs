//! The `reqstool` hook: annotations manifest plus archive work.

use std::path::Path;
use tracing::{debug, info};

use crate::config::{Mode, PluginConfig};
use crate::decorators::{CommandProcessor, DecoratorProcessor};
use reqstool_artifact::{
    splice_index, standalone_archive_name, ArchiveAssembler, IndexDocument, ResourceLayout,
};

use super::{names, BuildContext, BuildHook, HookError, HookPhase};

/// Build hook that generates the annotations manifest and either assembles the
/// standalone reqstool archive (at initialize) or splices the index document
/// into the primary artifact (at finalize).
pub struct ReqstoolHook {
    config: PluginConfig,
    layout: ResourceLayout,
    phase: HookPhase,
    processor: Box<dyn DecoratorProcessor>,
}

impl ReqstoolHook {
    pub fn new(config: PluginConfig) -> Self {
        let processor = Box::new(CommandProcessor::new(&config.processor));
        Self::with_processor(config, processor)
    }

    /// Construct with a custom processor implementation (used by tests).
    pub fn with_processor(config: PluginConfig, processor: Box<dyn DecoratorProcessor>) -> Self {
        Self {
            config,
            layout: ResourceLayout::default(),
            phase: HookPhase::Uninitialized,
            processor,
        }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> HookPhase {
        self.phase
    }

    fn assemble_standalone(&self, ctx: &mut BuildContext) -> Result<(), HookError> {
        let mut assembler = ArchiveAssembler::new();

        if self.config.bundle_dataset_tree {
            assembler.push_dir(&self.config.dataset_path, None);
        } else {
            for file in self.layout.dataset_files() {
                assembler.push(self.config.dataset_path.join(file), None);
            }
        }

        assembler.push(
            self.config.annotations_path(&self.layout.annotations_file),
            None,
        );
        assembler.push(
            &self.config.junit_xml_file,
            Some(&self.layout.test_results_dir),
        );

        let file_name = match &self.config.archive_name {
            Some(name) => name.clone(),
            None => standalone_archive_name(&ctx.metadata.name, &ctx.metadata.version),
        };
        let dest = self.config.output_directory.join(file_name);

        let report = assembler.assemble(&dest)?;
        info!(
            archive = %dest.display(),
            entries = report.entries.len(),
            "assembled reqstool archive"
        );

        ctx.artifacts.push(dest);
        ctx.reports.push(report);
        Ok(())
    }
}

impl BuildHook for ReqstoolHook {
    fn name(&self) -> &'static str {
        names::REQSTOOL
    }

    fn initialize(&mut self, ctx: &mut BuildContext) -> Result<(), HookError> {
        self.phase.transition(HookPhase::Initialized)?;

        info!(
            build_target = %ctx.target,
            version = %ctx.metadata.version,
            "reqstool plugin loaded"
        );

        self.processor
            .process(&self.config.sources, &self.config.output_directory)?;

        match self.config.mode {
            Mode::Standalone => self.assemble_standalone(ctx)?,
            Mode::Splice => {
                debug!("splice mode: archive work deferred to finalize");
            }
        }

        Ok(())
    }

    fn finalize(&mut self, ctx: &mut BuildContext, artifact: &Path) -> Result<(), HookError> {
        self.phase.transition(HookPhase::Finalized)?;

        if !artifact.to_string_lossy().ends_with(".tar.gz") {
            debug!(artifact = %artifact.display(), "ignoring non-tar.gz artifact");
            return Ok(());
        }

        if self.config.mode != Mode::Splice {
            debug!("standalone mode: nothing to do at finalize");
            return Ok(());
        }

        let index = IndexDocument::collect(
            &ctx.metadata.version,
            &self.layout,
            &self.config.dataset_path,
            &self.config.output_directory,
            &self.config.junit_xml_file,
        );

        splice_index(
            artifact,
            &index,
            &ctx.metadata.name,
            &ctx.metadata.version,
            &self.layout,
        )?;

        Ok(())
    }
}
