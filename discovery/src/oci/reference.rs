//! Image reference normalization.
//!
//! Splits raw candidates like `quay.io/org/app:v2` into registry, repository
//! and tag. Raw candidates come from the extractors unmodified, so anything
//! that cannot carry a tag is rejected here.

use conscanner_core::error::{Result, ScanError};
use conscanner_core::ImageRecord;

/// Default registry when none is specified.
pub const DEFAULT_REGISTRY: &str = "docker.io";

/// Parsed image reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    /// Registry hostname (e.g., "quay.io", "localhost:5000")
    pub registry: String,
    /// Repository path (e.g., "nginx", "org/app")
    pub repository: String,
    /// Tag (e.g., "latest", "v2")
    pub tag: String,
    /// Digest (e.g., "sha256:abc123...")
    pub digest: Option<String>,
}

impl ImageReference {
    /// Parse a raw reference, assuming `docker.io` when no registry is named.
    ///
    /// - `nginx:latest` → docker.io, nginx, latest
    /// - `localhost:5000/app:1` → localhost:5000, app, 1
    /// - `quay.io/org/app:v2` → quay.io, org/app, v2
    /// - `org/app:v2@sha256:abc...` → docker.io, org/app, v2, sha256:abc...
    pub fn parse(raw: &str) -> Result<Self> {
        Self::parse_with_default(raw, DEFAULT_REGISTRY)
    }

    /// Parse a raw reference with a custom default registry.
    pub fn parse_with_default(raw: &str, default_registry: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(ScanError::InvalidReference(
                "Empty image reference".to_string(),
            ));
        }

        let (registry, remainder) = split_registry(raw, default_registry);

        let (name_tag, digest) = match remainder.split_once('@') {
            Some((name_tag, digest)) => (name_tag, Some(digest.to_string())),
            None => (remainder, None),
        };

        // The first colon separates repository from tag
        let (repository, tag) = name_tag
            .split_once(':')
            .ok_or_else(|| ScanError::MissingTag(raw.to_string()))?;

        if repository.is_empty() {
            return Err(ScanError::InvalidReference(format!(
                "Empty repository in reference '{}'",
                raw
            )));
        }
        if tag.is_empty() {
            return Err(ScanError::MissingTag(raw.to_string()));
        }

        Ok(ImageReference {
            registry: registry.to_string(),
            repository: repository.to_string(),
            tag: tag.to_string(),
            digest,
        })
    }

    /// `registry/repository:tag`, the deduplication key.
    pub fn canonical(&self) -> String {
        format!("{}/{}:{}", self.registry, self.repository, self.tag)
    }

    /// Convert into a persisted record.
    pub fn to_record(&self, scheme: &str) -> ImageRecord {
        ImageRecord {
            scheme: scheme.to_string(),
            registry: self.registry.clone(),
            image: self.repository.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())?;
        if let Some(ref digest) = self.digest {
            write!(f, "@{}", digest)?;
        }
        Ok(())
    }
}

/// Split off the registry segment.
///
/// The text before the first `/` names a registry when it is `localhost`
/// or contains a `.` or `:`. Otherwise the whole reference is
/// `repository:tag` on the default registry.
fn split_registry<'a>(raw: &'a str, default_registry: &'a str) -> (&'a str, &'a str) {
    if let Some((first, rest)) = raw.split_once('/') {
        if first == "localhost" || first.contains('.') || first.contains(':') {
            return (first, rest);
        }
    }
    (default_registry, raw)
}
