//! Manifest file discovery.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

use conscanner_core::error::{Result, ScanError};
use ignore::WalkBuilder;

/// Whether a file name looks like YAML (`.yaml`/`.yml` anywhere in the
/// name, so `values.yaml.tpl` counts).
pub fn is_manifest_name(name: &OsStr) -> bool {
    let name = name.to_string_lossy();
    name.contains(".yaml") || name.contains(".yml")
}

/// List YAML manifests under `root`, sorted.
///
/// `root` may itself be a file. Any traversal error is fatal: a tree that
/// cannot be fully listed would silently drop images.
pub fn find_manifests(root: &Path) -> Result<Vec<PathBuf>> {
    let walk_error = |message: String| ScanError::DirectoryWalk {
        path: root.display().to_string(),
        message,
    };

    std::fs::symlink_metadata(root).map_err(|e| walk_error(e.to_string()))?;

    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .follow_links(false)
        .build();

    let mut manifests = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| walk_error(e.to_string()))?;
        let is_dir = entry.file_type().map_or(true, |t| t.is_dir());
        if !is_dir && is_manifest_name(entry.file_name()) {
            manifests.push(entry.into_path());
        }
    }

    manifests.sort();
    tracing::debug!(root = %root.display(), count = manifests.len(), "Listed manifests");
    Ok(manifests)
}
