//! Vulnerability report generation.
//!
//! Reads the persisted image document and runs the scanner once per image,
//! saving its raw output under the report directory as
//! `<scheme>_<registry>_<repository>_<tag>.json`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use conscanner_core::error::{Result, ScanError};
use conscanner_core::ScannerConfig;

use crate::store;

/// Produces a vulnerability report for an image reference.
#[async_trait]
pub trait Scanner: Send + Sync {
    async fn scan(&self, reference: &str) -> Result<Vec<u8>>;
}

/// Runs an external scanner CLI and captures its standard output.
pub struct CommandScanner {
    program: String,
    args: Vec<String>,
}

impl CommandScanner {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }

    /// The command line that scans `reference`, for logs.
    pub fn command_line(&self, reference: &str) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 2);
        parts.push(self.program.as_str());
        parts.extend(self.args.iter().map(String::as_str));
        parts.push(reference);
        parts.join(" ")
    }
}

#[async_trait]
impl Scanner for CommandScanner {
    async fn scan(&self, reference: &str) -> Result<Vec<u8>> {
        let output = tokio::process::Command::new(&self.program)
            .args(&self.args)
            .arg(reference)
            .output()
            .await
            .map_err(|e| ScanError::Scanner {
                command: self.command_line(reference),
                message: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ScanError::Scanner {
                command: self.command_line(reference),
                message: format!("{}: {}", output.status, stderr.trim()),
            });
        }
        Ok(output.stdout)
    }
}

/// Outcome of a report run.
#[derive(Debug, Default)]
pub struct ReportSummary {
    /// Report files written
    pub written: Vec<PathBuf>,
    /// References whose scan or write failed
    pub failed: Vec<String>,
}

/// Drives the scanner over a persisted image document.
pub struct ReportGenerator {
    scanner: Arc<dyn Scanner>,
    report_dir: PathBuf,
}

impl ReportGenerator {
    pub fn new(scanner: Arc<dyn Scanner>, report_dir: impl Into<PathBuf>) -> Self {
        Self {
            scanner,
            report_dir: report_dir.into(),
        }
    }

    /// Scan every image listed in `image_file`.
    ///
    /// Fails only if the report directory cannot be created or the document
    /// cannot be read. Per-image failures are logged and collected.
    pub async fn generate(&self, image_file: &Path) -> Result<ReportSummary> {
        std::fs::create_dir_all(&self.report_dir).map_err(|e| {
            tracing::error!(
                path = %self.report_dir.display(),
                error = %e,
                "Unable to create directory"
            );
            ScanError::ReportDir {
                path: self.report_dir.display().to_string(),
                message: e.to_string(),
            }
        })?;

        let document = store::load(image_file).map_err(|e| {
            tracing::error!(path = %image_file.display(), error = %e, "Unable to process file");
            e
        })?;

        let mut summary = ReportSummary::default();
        for record in &document.images {
            let reference = record.scan_reference();
            tracing::info!(reference = %reference, "Generating report");

            let report = match self.scanner.scan(&reference).await {
                Ok(report) => report,
                Err(e) => {
                    tracing::error!(
                        reference = %reference,
                        error = %e,
                        "Unable to run report command"
                    );
                    summary.failed.push(reference);
                    continue;
                }
            };

            let report_file = self.report_dir.join(record.report_file_name());
            match tokio::fs::write(&report_file, &report).await {
                Ok(()) => {
                    tracing::info!(
                        reference = %reference,
                        file = %report_file.display(),
                        "Report generated"
                    );
                    summary.written.push(report_file);
                }
                Err(e) => {
                    tracing::error!(
                        file = %report_file.display(),
                        error = %e,
                        "Unable to write report"
                    );
                    summary.failed.push(reference);
                }
            }
        }

        tracing::info!(
            written = summary.written.len(),
            failed = summary.failed.len(),
            "Done"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line() {
        let scanner = CommandScanner::new(&ScannerConfig::default());
        assert_eq!(
            scanner.command_line("nginx:1.25"),
            "grype --quiet --output json nginx:1.25"
        );
    }

    #[tokio::test]
    async fn test_missing_program_is_scanner_error() {
        let scanner = CommandScanner::new(&ScannerConfig {
            program: "conscanner-no-such-scanner".to_string(),
            args: vec![],
        });
        let err = scanner.scan("nginx:1.25").await.unwrap_err();
        assert!(matches!(err, ScanError::Scanner { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_command_output_is_captured() {
        let scanner = CommandScanner::new(&ScannerConfig {
            program: "echo".to_string(),
            args: vec!["-n".to_string()],
        });
        assert_eq!(scanner.scan("nginx:1.25").await.unwrap(), b"nginx:1.25".to_vec());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_scanner_error() {
        let scanner = CommandScanner::new(&ScannerConfig {
            program: "false".to_string(),
            args: vec![],
        });
        assert!(scanner.scan("nginx:1.25").await.is_err());
    }
}
