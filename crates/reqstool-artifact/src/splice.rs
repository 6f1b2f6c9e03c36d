//! Index splicing into an existing primary artifact.
//!
//! Rewrites the host-built tar.gz through a temporary file, dropping any
//! previous index entry and appending a fresh one, then atomically renames the
//! result over the original. A failed splice leaves the original untouched.

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tar::{Archive, Builder, Header};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::index::{IndexDocument, IndexError};
use crate::layout::ResourceLayout;
use crate::naming::sdist_root_dir;

/// Errors for splice operations
#[derive(Debug, thiserror::Error)]
pub enum SpliceError {
    #[error("Primary artifact not found: {0}")]
    MissingArtifact(PathBuf),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Index error: {0}")]
    IndexError(#[from] IndexError),

    #[error("Failed to replace artifact: {0}")]
    PersistError(#[from] tempfile::PersistError),
}

/// Splice `index` into the primary artifact at `artifact_path`.
///
/// The index lands at `<normalized-name>-<version>/<index_file>`. Any existing
/// entry under that name is replaced, so re-splicing is idempotent. Existing
/// entries are copied through with their original header fields.
pub fn splice_index(
    artifact_path: &Path,
    index: &IndexDocument,
    name: &str,
    version: &str,
    layout: &ResourceLayout,
) -> Result<(), SpliceError> {
    if !artifact_path.exists() {
        return Err(SpliceError::MissingArtifact(artifact_path.to_path_buf()));
    }

    let index_entry_name = format!("{}/{}", sdist_root_dir(name, version), layout.index_file);
    let serialized = index.to_yaml()?;

    let parent = artifact_path.parent().unwrap_or_else(|| Path::new("."));
    let temp = NamedTempFile::new_in(parent)?;
    let mut encoder = GzEncoder::new(temp, Compression::default());

    {
        let mut builder = Builder::new(&mut encoder);

        let file = File::open(artifact_path)?;
        let mut archive = Archive::new(GzDecoder::new(BufReader::new(file)));

        for entry in archive.entries()? {
            let mut entry = entry?;
            let path = entry.path()?.into_owned();

            if path.as_os_str() == index_entry_name.as_str() {
                debug!(entry = %path.display(), "replacing existing index entry");
                continue;
            }

            let mut header = entry.header().clone();
            let mut contents = Vec::new();
            entry.read_to_end(&mut contents)?;
            builder.append_data(&mut header, &path, contents.as_slice())?;
        }

        let mtime = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut header = Header::new_ustar();
        header.set_size(serialized.len() as u64);
        header.set_mtime(mtime);
        header.set_uid(0);
        header.set_gid(0);
        header.set_mode(0o644);
        builder.append_data(&mut header, &index_entry_name, serialized.as_bytes())?;

        builder.finish()?;
    }

    let mut temp = encoder.finish()?;
    temp.flush()?;
    temp.persist(artifact_path)?;

    info!(
        artifact = %artifact_path.display(),
        entry = %index_entry_name,
        "spliced index document"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ResourcePaths;
    use std::fs;
    use tempfile::TempDir;

    fn make_sdist(path: &Path, root: &str) {
        let file = File::create(path).unwrap();
        let encoder = GzEncoder::new(file, Compression::default());
        let mut builder = Builder::new(encoder);

        let payload = b"[package]\nname = \"mypkg\"\n";
        let mut header = Header::new_ustar();
        header.set_size(payload.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{}/Cargo.toml", root),
                payload.as_slice(),
            )
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap();
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let file = File::open(path).unwrap();
        let mut archive = Archive::new(GzDecoder::new(file));
        archive
            .entries()
            .unwrap()
            .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
            .collect()
    }

    fn sample_index() -> IndexDocument {
        IndexDocument::new(
            "1.0.0",
            ResourcePaths {
                requirements: Some("reqstool/requirements.yml".to_string()),
                test_results: vec!["build/junit.xml".to_string()],
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_splice_adds_index_entry() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("mypkg-1.0.0.tar.gz");
        make_sdist(&artifact, "mypkg-1.0.0");

        let layout = ResourceLayout::default();
        splice_index(&artifact, &sample_index(), "mypkg", "1.0.0", &layout).unwrap();

        let names = entry_names(&artifact);
        assert!(names.contains(&"mypkg-1.0.0/Cargo.toml".to_string()));
        assert!(names.contains(&"mypkg-1.0.0/reqstool_index.yml".to_string()));
    }

    #[test]
    fn test_resplice_replaces_rather_than_duplicates() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("mypkg-1.0.0.tar.gz");
        make_sdist(&artifact, "mypkg-1.0.0");

        let layout = ResourceLayout::default();
        splice_index(&artifact, &sample_index(), "mypkg", "1.0.0", &layout).unwrap();
        splice_index(&artifact, &sample_index(), "mypkg", "1.0.0", &layout).unwrap();

        let names = entry_names(&artifact);
        let index_entries = names
            .iter()
            .filter(|n| n.as_str() == "mypkg-1.0.0/reqstool_index.yml")
            .count();
        assert_eq!(index_entries, 1);
    }

    #[test]
    fn test_spliced_content_round_trips() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("mypkg-1.0.0.tar.gz");
        make_sdist(&artifact, "mypkg-1.0.0");

        let layout = ResourceLayout::default();
        let index = sample_index();
        splice_index(&artifact, &index, "mypkg", "1.0.0", &layout).unwrap();

        let file = File::open(&artifact).unwrap();
        let mut archive = Archive::new(GzDecoder::new(file));
        let mut found = None;
        for entry in archive.entries().unwrap() {
            let mut entry = entry.unwrap();
            if entry.path().unwrap().ends_with("reqstool_index.yml") {
                let mut content = String::new();
                entry.read_to_string(&mut content).unwrap();
                found = Some(content);
            }
        }
        let content = found.expect("index entry present");
        assert!(content.starts_with("# yaml-language-server: $schema="));
        assert_eq!(IndexDocument::from_yaml(&content).unwrap(), index);
    }

    #[test]
    fn test_missing_artifact_is_fatal() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("absent.tar.gz");

        let layout = ResourceLayout::default();
        let err = splice_index(&artifact, &sample_index(), "mypkg", "1.0.0", &layout).unwrap_err();
        assert!(matches!(err, SpliceError::MissingArtifact(_)));
    }

    #[test]
    fn test_failed_splice_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("mypkg-1.0.0.tar.gz");
        fs::write(&artifact, "not a gzip container").unwrap();
        let before = fs::read(&artifact).unwrap();

        let layout = ResourceLayout::default();
        let result = splice_index(&artifact, &sample_index(), "mypkg", "1.0.0", &layout);
        assert!(result.is_err());
        assert_eq!(fs::read(&artifact).unwrap(), before);
    }

    #[test]
    fn test_normalized_name_in_entry_path() {
        let dir = TempDir::new().unwrap();
        let artifact = dir.path().join("my-pkg-1.0.0.tar.gz");
        make_sdist(&artifact, "my-pkg-1.0.0");

        let layout = ResourceLayout::default();
        splice_index(&artifact, &sample_index(), "My_Pkg", "1.0.0", &layout).unwrap();

        let names = entry_names(&artifact);
        assert!(names.contains(&"my-pkg-1.0.0/reqstool_index.yml".to_string()));
    }
}
