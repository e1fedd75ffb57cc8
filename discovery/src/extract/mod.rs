//! Image reference extraction.
//!
//! Two independent strategies feed one `ReferenceSet`:
//!
//! - `pattern`: grammar match over the raw text of a file
//! - `structure`: walk of the parsed YAML looking for `image` blocks
//!
//! Each file is read once and handed to both.

pub mod pattern;
pub mod structure;

use std::path::Path;
use std::sync::Arc;

use conscanner_core::error::Result;

pub use pattern::PatternExtractor;
pub use structure::{Node, NodeVisitor, StructuralExtractor};

use crate::set::ReferenceSet;

/// Per-file extraction outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileExtraction {
    pub pattern_matches: usize,
    pub image_blocks: usize,
    /// The file was read but was not valid YAML
    pub parse_failed: bool,
}

/// Both extractors, compiled once per run.
#[derive(Debug, Clone)]
pub struct Extractors {
    pattern: PatternExtractor,
    structure: StructuralExtractor,
}

impl Extractors {
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: PatternExtractor::new()?,
            structure: StructuralExtractor::new(),
        })
    }

    /// Run both extractors over one file's text.
    ///
    /// Invalid YAML only stops the structural pass; pattern matches from
    /// the same text are kept.
    pub fn extract_text(&self, path: &Path, text: &str, set: &ReferenceSet) -> FileExtraction {
        let pattern_matches = self.pattern.extract(text, set);
        let (image_blocks, parse_failed) = match self.structure.extract(path, text, set) {
            Ok(found) => (found, false),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unable to load YAML file");
                (0, true)
            }
        };

        FileExtraction {
            pattern_matches,
            image_blocks,
            parse_failed,
        }
    }

    /// Read a file and extract from it. Unreadable files are skipped.
    ///
    /// Matching and YAML parsing run on the blocking pool so that several
    /// files are processed in parallel.
    pub async fn extract_file(
        &self,
        path: &Path,
        set: &Arc<ReferenceSet>,
    ) -> Option<FileExtraction> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Unable to read file");
                return None;
            }
        };

        let extractors = self.clone();
        let set = Arc::clone(set);
        let owned_path = path.to_path_buf();
        let task = tokio::task::spawn_blocking(move || {
            let text = String::from_utf8_lossy(&bytes);
            extractors.extract_text(&owned_path, &text, &set)
        });
        match task.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Extraction task failed");
                None
            }
        }
    }
}
