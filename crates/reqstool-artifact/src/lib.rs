//! Archive assembly and index splicing for requirements-traceability artifacts.
//!
//! This crate is the pure core of the reqstool packaging plugin: it knows how
//! to lay out the fixed-name traceability files, assemble them into a
//! standalone tar.gz, and splice an index document into an already-built
//! distribution container. It has no knowledge of the host build tool or its
//! lifecycle hooks.

mod archive;
mod index;
mod layout;
mod naming;
mod splice;

pub use archive::{ArchiveAssembler, ArchiveError, AssembleReport};
pub use index::{IndexDocument, IndexError, ResourcePaths, INDEX_SCHEMA_URL};
pub use layout::ResourceLayout;
pub use naming::{normalize_name, sdist_root_dir, standalone_archive_name};
pub use splice::{splice_index, SpliceError};
