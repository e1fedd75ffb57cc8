//! Reading and writing the persisted `images.json` document.
//!
//! Writes are atomic (write tmp, rename) so a failed run never leaves a
//! truncated document for `report` to pick up.

use std::path::Path;

use conscanner_core::error::{Result, ScanError};
use conscanner_core::ImagesDocument;

/// Write `document` to `path`.
pub fn save(document: &ImagesDocument, path: &Path) -> Result<()> {
    let persist_error = |message: String| ScanError::Persist {
        path: path.display().to_string(),
        message,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| persist_error(e.to_string()))?;
    }

    let data = serde_json::to_string_pretty(document)?;
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, data).map_err(|e| persist_error(e.to_string()))?;
    std::fs::rename(&tmp_path, path).map_err(|e| persist_error(e.to_string()))?;

    tracing::debug!(path = %path.display(), images = document.len(), "Wrote image document");
    Ok(())
}

/// Read the document at `path`.
pub fn load(path: &Path) -> Result<ImagesDocument> {
    let data = std::fs::read_to_string(path).map_err(|e| ScanError::Persist {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&data).map_err(|e| ScanError::Persist {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
