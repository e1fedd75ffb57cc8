use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, ScanError};

/// conscanner configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Transport scheme recorded on every validated image
    pub scheme: String,

    /// Registry assumed when a reference names none
    pub default_registry: String,

    /// Registry lookup settings
    pub lookup: LookupConfig,

    /// Maximum number of manifest files extracted at once
    pub extract_concurrency: usize,

    /// Where `images` writes the validated document
    pub output: PathBuf,

    /// Where `report` writes per-image scan results
    pub report_dir: PathBuf,

    /// External vulnerability scanner
    pub scanner: ScannerConfig,

    /// Log level
    pub log_level: LogLevel,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            default_registry: "docker.io".to_string(),
            lookup: LookupConfig::default(),
            extract_concurrency: 8,
            output: PathBuf::from("images.json"),
            report_dir: PathBuf::from("conscanner-reports"),
            scanner: ScannerConfig::default(),
            log_level: LogLevel::Info,
        }
    }
}

impl ScanConfig {
    /// Load configuration from a YAML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| {
            ScanError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_yaml::from_str(&data).map_err(|e| {
            ScanError::Config(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.scheme.is_empty() {
            return Err(ScanError::Config("scheme must not be empty".to_string()));
        }
        if self.lookup.concurrency == 0 || self.extract_concurrency == 0 {
            return Err(ScanError::Config(
                "concurrency limits must be at least 1".to_string(),
            ));
        }
        if self.lookup.timeout_secs == 0 {
            return Err(ScanError::Config(
                "lookup timeout must be at least 1 second".to_string(),
            ));
        }
        if self.scanner.program.is_empty() {
            return Err(ScanError::Config("scanner program must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Registry lookup configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Base URL of the tag API
    pub base_url: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Maximum concurrent lookups
    pub concurrency: usize,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: "https://hub.docker.com".to_string(),
            timeout_secs: 10,
            concurrency: 8,
        }
    }
}

/// Scanner command configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Executable name or path
    pub program: String,

    /// Arguments placed before the image reference
    pub args: Vec<String>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            program: "grype".to_string(),
            args: vec![
                "--quiet".to_string(),
                "--output".to_string(),
                "json".to_string(),
            ],
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            _ => Err(format!(
                "unknown log level: '{}' (supported: debug, info, warn, error)",
                s
            )),
        }
    }
}
