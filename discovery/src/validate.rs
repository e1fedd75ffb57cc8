//! Candidate validation.
//!
//! Each raw reference is normalized into registry/repository/tag and
//! checked against the registry lookup. Failures drop the candidate; they
//! never fail the run.

use std::sync::Arc;

use conscanner_core::{ImageRecord, ScanConfig};
use futures::stream::{self, StreamExt};

use crate::oci::{ImageReference, RegistryLookup};

/// Turns raw references into validated records.
pub struct Validator {
    lookup: Arc<dyn RegistryLookup>,
    scheme: String,
    default_registry: String,
    concurrency: usize,
}

impl Validator {
    pub fn new(lookup: Arc<dyn RegistryLookup>, config: &ScanConfig) -> Self {
        Self {
            lookup,
            scheme: config.scheme.clone(),
            default_registry: config.default_registry.clone(),
            concurrency: config.lookup.concurrency.max(1),
        }
    }

    /// Validate one raw reference. `None` means the candidate is dropped.
    pub async fn validate(&self, raw: &str) -> Option<ImageRecord> {
        tracing::info!(reference = %raw, "Validating image");

        let reference = match ImageReference::parse_with_default(raw, &self.default_registry) {
            Ok(reference) => reference,
            Err(e) => {
                tracing::info!(reference = %raw, reason = %e, "Skipping candidate");
                return None;
            }
        };

        if self.lookup.exists(&reference.repository, &reference.tag).await {
            tracing::info!(reference = %reference, "Image is valid");
            Some(reference.to_record(&self.scheme))
        } else {
            tracing::warn!(reference = %raw, "Invalid image or image does not exist");
            None
        }
    }

    /// Validate every candidate with at most `concurrency` lookups in flight.
    pub async fn validate_all(&self, references: Vec<String>) -> Vec<ImageRecord> {
        stream::iter(references)
            .map(|raw| async move { self.validate(&raw).await })
            .buffer_unordered(self.concurrency)
            .filter_map(|record| async move { record })
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashSet;

    /// Answers from a fixed list and records every call.
    struct FakeLookup {
        known: HashSet<(String, String)>,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeLookup {
        fn new(known: &[(&str, &str)]) -> Self {
            Self {
                known: known
                    .iter()
                    .map(|(r, t)| (r.to_string(), t.to_string()))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RegistryLookup for FakeLookup {
        async fn exists(&self, repository: &str, tag: &str) -> bool {
            self.calls.lock().push((repository.to_string(), tag.to_string()));
            self.known.contains(&(repository.to_string(), tag.to_string()))
        }
    }

    fn validator(lookup: Arc<FakeLookup>) -> Validator {
        Validator::new(lookup, &ScanConfig::default())
    }

    #[tokio::test]
    async fn test_valid_reference_becomes_record() {
        let lookup = Arc::new(FakeLookup::new(&[("org/app", "v2")]));
        let record = validator(lookup).validate("quay.io/org/app:v2").await.unwrap();
        assert_eq!(
            record,
            ImageRecord {
                scheme: "https".to_string(),
                registry: "quay.io".to_string(),
                image: "org/app".to_string(),
                tag: "v2".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_unknown_reference_is_dropped() {
        let lookup = Arc::new(FakeLookup::new(&[]));
        assert!(validator(lookup).validate("nginx:latest").await.is_none());
    }

    #[tokio::test]
    async fn test_missing_tag_skips_lookup() {
        let lookup = Arc::new(FakeLookup::new(&[("org/app", "v2")]));
        let v = validator(Arc::clone(&lookup));
        assert!(v.validate("quay.io/org/app").await.is_none());
        assert!(lookup.calls.lock().is_empty());
    }

    #[tokio::test]
    async fn test_validate_all_one_call_per_candidate() {
        let lookup = Arc::new(FakeLookup::new(&[("nginx", "latest"), ("app", "1")]));
        let v = validator(Arc::clone(&lookup));
        let mut records = v
            .validate_all(vec![
                "nginx:latest".to_string(),
                "localhost:5000/app:1".to_string(),
                "example.com/docs:8080".to_string(),
                "no-tag".to_string(),
            ])
            .await;
        records.sort();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].registry, "docker.io");
        assert_eq!(records[0].image, "nginx");
        assert_eq!(records[1].registry, "localhost:5000");
        assert_eq!(lookup.calls.lock().len(), 3);
    }
}
