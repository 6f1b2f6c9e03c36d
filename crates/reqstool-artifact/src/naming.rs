//! Component-name normalization and derived artifact names.

/// Normalize a component name for use in artifact file names.
///
/// Lowercases the name and collapses runs of `-`, `_`, and `.` into a single
/// `-`, matching the normalization applied to sdist-style container names.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_sep = false;

    for c in name.chars() {
        if c == '-' || c == '_' || c == '.' {
            pending_sep = !out.is_empty();
        } else {
            if pending_sep {
                out.push('-');
                pending_sep = false;
            }
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        }
    }

    out
}

/// File name of the standalone secondary archive.
pub fn standalone_archive_name(name: &str, version: &str) -> String {
    format!("{}-{}-reqstool.tar.gz", normalize_name(name), version)
}

/// Top-level directory inside an sdist-style container.
pub fn sdist_root_dir(name: &str, version: &str) -> String {
    format!("{}-{}", normalize_name(name), version)
}
