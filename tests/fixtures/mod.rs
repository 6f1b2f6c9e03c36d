//! Shared fixtures for hook lifecycle, assembly, and splice tests.

#![allow(dead_code)]

use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use reqstool_pack::{DecoratorProcessor, PluginConfig, ProcessorError};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tar::{Archive, Builder, Header};

/// Mock decorator processor that counts invocations and fabricates the
/// annotations manifest the real collaborator would write.
pub struct MockProcessor {
    invocations: Arc<AtomicU32>,
    write_manifest: bool,
}

impl MockProcessor {
    pub fn new() -> (Self, Arc<AtomicU32>) {
        let invocations = Arc::new(AtomicU32::new(0));
        (
            Self {
                invocations: Arc::clone(&invocations),
                write_manifest: true,
            },
            invocations,
        )
    }

    /// A processor that runs but never produces the manifest
    pub fn without_manifest() -> (Self, Arc<AtomicU32>) {
        let invocations = Arc::new(AtomicU32::new(0));
        (
            Self {
                invocations: Arc::clone(&invocations),
                write_manifest: false,
            },
            invocations,
        )
    }
}

impl DecoratorProcessor for MockProcessor {
    fn process(&self, _sources: &[PathBuf], output_dir: &Path) -> Result<(), ProcessorError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        fs::create_dir_all(output_dir)?;
        if self.write_manifest {
            fs::write(
                output_dir.join("annotations.yml"),
                "requirement_annotations: {}\n",
            )?;
        }
        Ok(())
    }
}

/// Plugin config rooted in a test directory
pub fn test_config(root: &Path) -> PluginConfig {
    PluginConfig {
        sources: vec![root.join("src/pkg")],
        dataset_path: root.join("reqstool"),
        output_directory: root.join("build/reqstool"),
        junit_xml_file: root.join("build/junit.xml"),
        ..Default::default()
    }
}

/// Create the full dataset: three companion files plus a junit report
pub fn create_dataset(root: &Path) {
    let dataset = root.join("reqstool");
    fs::create_dir_all(&dataset).unwrap();
    fs::write(dataset.join("requirements.yml"), "requirements: []\n").unwrap();
    fs::write(
        dataset.join("software_verification_cases.yml"),
        "cases: []\n",
    )
    .unwrap();
    fs::write(
        dataset.join("manual_verification_results.yml"),
        "results: []\n",
    )
    .unwrap();

    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/junit.xml"), "<testsuite/>\n").unwrap();
}

/// Create a minimal sdist-style primary artifact with one entry
pub fn make_sdist(path: &Path, root_dir: &str) {
    let file = File::create(path).unwrap();
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = Builder::new(encoder);

    let payload = b"[package]\nname = \"mypkg\"\n";
    let mut header = Header::new_ustar();
    header.set_size(payload.len() as u64);
    header.set_mode(0o644);
    builder
        .append_data(
            &mut header,
            format!("{}/Cargo.toml", root_dir),
            payload.as_slice(),
        )
        .unwrap();
    builder.into_inner().unwrap().finish().unwrap();
}

/// List entry names in a tar.gz
pub fn archive_names(path: &Path) -> Vec<String> {
    let file = File::open(path).unwrap();
    let mut archive = Archive::new(GzDecoder::new(file));
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Read one entry's contents from a tar.gz
pub fn archive_entry_contents(path: &Path, entry_name: &str) -> Option<String> {
    use std::io::Read;

    let file = File::open(path).unwrap();
    let mut archive = Archive::new(GzDecoder::new(file));
    for entry in archive.entries().unwrap() {
        let mut entry = entry.unwrap();
        if entry.path().unwrap().to_string_lossy() == entry_name {
            let mut contents = String::new();
            entry.read_to_string(&mut contents).unwrap();
            return Some(contents);
        }
    }
    None
}
