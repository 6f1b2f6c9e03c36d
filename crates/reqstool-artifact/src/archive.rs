//! Standalone secondary-archive assembly.
//!
//! Collects `(path, optional group)` entries in order and writes a single
//! gzip-compressed tar. Sources that do not exist on disk at assembly time are
//! skipped silently; that is the intended best-effort policy, not an error.

use chrono::{DateTime, Utc};
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;
use tar::{Builder, Header};
use tracing::debug;
use walkdir::WalkDir;

/// Errors for archive assembly
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Entry has no file name: {0}")]
    NoFileName(PathBuf),
}

/// How a queued source maps to names inside the archive.
#[derive(Debug, Clone)]
enum EntrySource {
    /// A single file placed under its base name
    File(PathBuf),
    /// A directory tree placed under entry-relative paths
    Tree(PathBuf),
}

/// A queued archive entry
#[derive(Debug, Clone)]
struct QueuedEntry {
    source: EntrySource,
    group: Option<String>,
}

/// Report of one assembly run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssembleReport {
    /// When the archive was written
    pub created_at: DateTime<Utc>,

    /// Where the archive was written
    pub destination: PathBuf,

    /// SHA-256 of the compressed archive bytes
    pub sha256: String,

    /// Entry names added, in archive order
    pub entries: Vec<String>,

    /// Sources skipped because they were absent
    pub skipped: Vec<PathBuf>,
}

/// Assembles the standalone reqstool archive.
#[derive(Debug, Default)]
pub struct ArchiveAssembler {
    queue: Vec<QueuedEntry>,
}

impl ArchiveAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a single file, placed at the archive root under its base name,
    /// or under `<group>/<base name>` when a group is given.
    pub fn push(&mut self, path: impl Into<PathBuf>, group: Option<&str>) -> &mut Self {
        self.queue.push(QueuedEntry {
            source: EntrySource::File(path.into()),
            group: group.map(str::to_string),
        });
        self
    }

    /// Queue a directory tree; each file lands under its path relative to the
    /// pushed directory, optionally prefixed by `group`.
    pub fn push_dir(&mut self, dir: impl Into<PathBuf>, group: Option<&str>) -> &mut Self {
        self.queue.push(QueuedEntry {
            source: EntrySource::Tree(dir.into()),
            group: group.map(str::to_string),
        });
        self
    }

    /// Write the gzip-compressed tar to `dest`, rewriting any existing file.
    pub fn assemble(&self, dest: &Path) -> Result<AssembleReport, ArchiveError> {
        let mut tar_buffer = Vec::new();
        let mut entries = Vec::new();
        let mut skipped = Vec::new();

        {
            let mut builder = Builder::new(&mut tar_buffer);

            for queued in &self.queue {
                match &queued.source {
                    EntrySource::File(path) => {
                        if !path.exists() {
                            debug!(path = %path.display(), "skipping absent source");
                            skipped.push(path.clone());
                            continue;
                        }
                        let base = path
                            .file_name()
                            .ok_or_else(|| ArchiveError::NoFileName(path.clone()))?;
                        let name = match &queued.group {
                            Some(group) => format!("{}/{}", group, base.to_string_lossy()),
                            None => base.to_string_lossy().into_owned(),
                        };
                        append_file(&mut builder, path, &name)?;
                        entries.push(name);
                    }
                    EntrySource::Tree(dir) => {
                        if !dir.exists() {
                            debug!(path = %dir.display(), "skipping absent source");
                            skipped.push(dir.clone());
                            continue;
                        }
                        for entry in WalkDir::new(dir)
                            .follow_links(false)
                            .sort_by(|a, b| a.file_name().cmp(b.file_name()))
                        {
                            let entry = entry?;
                            if !entry.file_type().is_file() {
                                continue;
                            }
                            let rel = entry
                                .path()
                                .strip_prefix(dir)
                                .unwrap_or(entry.path())
                                .to_string_lossy()
                                .into_owned();
                            let name = match &queued.group {
                                Some(group) => format!("{}/{}", group, rel),
                                None => rel,
                            };
                            append_file(&mut builder, entry.path(), &name)?;
                            entries.push(name);
                        }
                    }
                }
            }

            builder.finish()?;
        }

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_buffer)?;
        let compressed = encoder.finish()?;

        let sha256 = {
            let mut hasher = Sha256::new();
            hasher.update(&compressed);
            hex::encode(hasher.finalize())
        };

        fs::write(dest, &compressed)?;

        Ok(AssembleReport {
            created_at: Utc::now(),
            destination: dest.to_path_buf(),
            sha256,
            entries,
            skipped,
        })
    }
}

/// Append one file to the tar with a POSIX ustar header.
fn append_file<W: Write>(
    builder: &mut Builder<W>,
    path: &Path,
    name: &str,
) -> Result<(), ArchiveError> {
    let mut file = File::open(path)?;
    let mut contents = Vec::new();
    file.read_to_end(&mut contents)?;

    let mtime = fs::metadata(path)?
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0);

    let mut header = Header::new_ustar();
    header.set_path(name)?;
    header.set_size(contents.len() as u64);
    header.set_mtime(mtime);
    header.set_uid(0);
    header.set_gid(0);
    header.set_mode(0o644);
    header.set_cksum();

    builder.append(&header, contents.as_slice())?;
    Ok(())
}
