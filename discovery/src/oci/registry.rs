//! Registry existence checks.
//!
//! Validation only needs to know whether a repository serves a tag, so the
//! lookup is a single read-only call per candidate. `HubTagLookup` asks the
//! Docker Hub tag API; tests plug in their own `RegistryLookup`.

use std::time::Duration;

use async_trait::async_trait;
use conscanner_core::error::{Result, ScanError};
use conscanner_core::LookupConfig;

/// Answers whether a repository serves a tag.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    /// Any failure (network, timeout, non-success status) is `false`.
    async fn exists(&self, repository: &str, tag: &str) -> bool;
}

/// Looks up tags through the Docker Hub v2 repository API.
pub struct HubTagLookup {
    client: reqwest::Client,
    base_url: String,
}

impl HubTagLookup {
    /// Create a lookup client with the configured base URL and timeout.
    pub fn new(config: &LookupConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(format!("conscanner/{}", conscanner_core::VERSION))
            .build()
            .map_err(|e| ScanError::Lookup {
                registry: config.base_url.clone(),
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// URL of the tag resource.
    ///
    /// Official images live under `library/` on Docker Hub. Every path
    /// segment is percent-encoded, so `#`, `?` or `%` in manifest text
    /// cannot redirect the lookup to another resource.
    pub fn tag_url(&self, repository: &str, tag: &str) -> Result<reqwest::Url> {
        let invalid = |message: String| ScanError::Lookup {
            registry: self.base_url.clone(),
            message,
        };
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| invalid(format!("Invalid lookup URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| invalid("Lookup URL cannot be a base".to_string()))?;
            segments.pop_if_empty().extend(["v2", "repositories"]);
            if !repository.contains('/') {
                segments.push("library");
            }
            segments.extend(repository.split('/'));
            segments.extend(["tags", tag]);
        }
        Ok(url)
    }

    async fn check(&self, url: reqwest::Url) -> Result<()> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScanError::Lookup {
                registry: self.base_url.clone(),
                message: e.to_string(),
            })?;

        response.error_for_status().map_err(|e| ScanError::Lookup {
            registry: self.base_url.clone(),
            message: e.to_string(),
        })?;
        Ok(())
    }
}

#[async_trait]
impl RegistryLookup for HubTagLookup {
    async fn exists(&self, repository: &str, tag: &str) -> bool {
        let url = match self.tag_url(repository, tag) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(repository, tag, error = %e, "Tag lookup failed");
                return false;
            }
        };
        match self.check(url.clone()).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(url = %url, error = %e, "Tag lookup failed");
                false
            }
        }
    }
}
