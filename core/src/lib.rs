//! conscanner core - shared types for image discovery and reporting.
//!
//! Error, configuration and persisted-record types used by the discovery
//! engine and the CLI.

pub mod config;
pub mod error;
pub mod image;

// Re-export commonly used types
pub use config::{LogLevel, LookupConfig, ScanConfig, ScannerConfig};
pub use error::{Result, ScanError};
pub use image::{ImageRecord, ImagesDocument};

/// conscanner version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
