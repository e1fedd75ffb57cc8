//! conscanner discovery - container image discovery in YAML manifests.
//!
//! Locates manifests under a directory, extracts image references with a
//! grammar search and a structural YAML walk, validates the candidates
//! against a registry and persists the result. The report driver consumes
//! the persisted document and runs a vulnerability scanner per image.

pub mod extract;
pub mod locate;
pub mod oci;
pub mod pipeline;
pub mod report;
pub mod set;
pub mod store;
pub mod validate;

// Re-export common types
pub use extract::{Extractors, Node, NodeVisitor, PatternExtractor, StructuralExtractor};
pub use locate::find_manifests;
pub use oci::{HubTagLookup, ImageReference, RegistryLookup, DEFAULT_REGISTRY};
pub use pipeline::Discovery;
pub use report::{CommandScanner, ReportGenerator, ReportSummary, Scanner};
pub use set::ReferenceSet;
pub use validate::Validator;

/// conscanner discovery version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
