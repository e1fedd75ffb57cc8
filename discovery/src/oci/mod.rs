//! Image identity and registry access.

pub mod reference;
pub mod registry;

pub use reference::{ImageReference, DEFAULT_REGISTRY};
pub use registry::{HubTagLookup, RegistryLookup};
