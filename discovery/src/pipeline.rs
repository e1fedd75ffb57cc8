//! Discovery pipeline: locate → extract → validate.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use conscanner_core::error::{Result, ScanError};
use conscanner_core::{ImagesDocument, ScanConfig};
use futures::stream::{self, StreamExt};

use crate::extract::Extractors;
use crate::locate::find_manifests;
use crate::oci::RegistryLookup;
use crate::set::ReferenceSet;
use crate::validate::Validator;

/// Finds and validates every image referenced under a directory.
pub struct Discovery {
    config: ScanConfig,
    extractors: Extractors,
    validator: Validator,
}

impl Discovery {
    pub fn new(config: ScanConfig, lookup: Arc<dyn RegistryLookup>) -> Result<Self> {
        config.validate()?;
        let validator = Validator::new(lookup, &config);
        Ok(Self {
            config,
            extractors: Extractors::new()?,
            validator,
        })
    }

    /// Extract raw references from `files` into a fresh set.
    ///
    /// Up to `extract_concurrency` files are in flight; each file's
    /// matching and parsing runs on the blocking pool, so files are
    /// processed in parallel. Unreadable or invalid files are skipped.
    pub async fn extract(&self, files: &[PathBuf]) -> Arc<ReferenceSet> {
        let set = Arc::new(ReferenceSet::new());
        let limit = self.config.extract_concurrency.max(1);

        stream::iter(files)
            .for_each_concurrent(limit, |path| {
                let set = &set;
                async move {
                    if let Some(outcome) = self.extractors.extract_file(path, set).await {
                        tracing::debug!(
                            path = %path.display(),
                            pattern = outcome.pattern_matches,
                            blocks = outcome.image_blocks,
                            "Extracted"
                        );
                    }
                }
            })
            .await;

        set
    }

    /// Run the whole pipeline for `root`.
    pub async fn run(&self, root: &Path) -> Result<ImagesDocument> {
        tracing::info!(root = %root.display(), "Finding images");

        let walk_root = root.to_path_buf();
        let files = tokio::task::spawn_blocking(move || find_manifests(&walk_root))
            .await
            .map_err(|e| ScanError::Other(format!("Directory walk task failed: {}", e)))?
            .map_err(|e| {
                tracing::error!(error = %e, "Unable to process directory");
                e
            })?;
        tracing::info!(files = files.len(), "Found manifest files");

        let set = self.extract(&files).await;
        tracing::info!(candidates = set.len(), "Collected image candidates");

        let records = self.validator.validate_all(set.drain()).await;
        let document = ImagesDocument::new(records);
        tracing::info!(images = document.len(), "Validation finished");
        Ok(document)
    }
}
