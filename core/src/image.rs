//! Persisted image records.
//!
//! `images.json` is the handoff between the `images` and `report` commands:
//!
//! ```json
//! {"images": [
//!   {"scheme": "https", "registry": "docker.io", "image": "library/nginx", "tag": "1.25"}
//! ]}
//! ```

use serde::{Deserialize, Serialize};

/// A registry-confirmed image identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ImageRecord {
    pub scheme: String,
    pub registry: String,
    /// Repository path within the registry
    pub image: String,
    pub tag: String,
}

impl ImageRecord {
    /// `repository:tag`, the form handed to the scanner.
    pub fn scan_reference(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }

    /// `registry/repository:tag`.
    pub fn canonical(&self) -> String {
        format!("{}/{}:{}", self.registry, self.image, self.tag)
    }

    /// File name for this image's scan report.
    pub fn report_file_name(&self) -> String {
        format!(
            "{}_{}_{}_{}.json",
            self.scheme,
            self.registry.replace(':', "_"),
            self.image.replace('/', "_"),
            self.tag
        )
    }
}

impl std::fmt::Display for ImageRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// The persisted document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagesDocument {
    pub images: Vec<ImageRecord>,
}

impl ImagesDocument {
    pub fn new(mut images: Vec<ImageRecord>) -> Self {
        images.sort();
        images.dedup();
        Self { images }
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
