use thiserror::Error;

/// conscanner error types
#[derive(Error, Debug)]
pub enum ScanError {
    /// Root directory could not be traversed
    #[error("Unable to process directory: {path} - {message}")]
    DirectoryWalk { path: String, message: String },

    /// Manifest file could not be read
    #[error("Unable to read file: {path} - {message}")]
    ManifestRead { path: String, message: String },

    /// Manifest file is not valid YAML
    #[error("Unable to load YAML file: {path} - {message}")]
    ManifestParse { path: String, message: String },

    /// Raw reference could not be split into registry and repository
    #[error("Invalid image reference: {0}")]
    InvalidReference(String),

    /// Raw reference carries no tag
    #[error("Image reference has no tag: {0}")]
    MissingTag(String),

    /// Registry lookup failed
    #[error("Registry lookup failed: {registry} - {message}")]
    Lookup { registry: String, message: String },

    /// External scanner command failed
    #[error("Scanner command failed: {command} - {message}")]
    Scanner { command: String, message: String },

    /// Report output directory could not be created
    #[error("Unable to create directory: {path} - {message}")]
    ReportDir { path: String, message: String },

    /// Persisted document could not be written or read
    #[error("Unable to process file: {path} - {message}")]
    Persist { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for ScanError {
    fn from(err: serde_json::Error) -> Self {
        ScanError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for ScanError {
    fn from(err: serde_yaml::Error) -> Self {
        ScanError::Serialization(err.to_string())
    }
}

/// Result type alias for conscanner operations
pub type Result<T> = std::result::Result<T, ScanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_walk_error_display() {
        let error = ScanError::DirectoryWalk {
            path: "/charts".to_string(),
            message: "permission denied".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unable to process directory: /charts - permission denied"
        );
    }

    #[test]
    fn test_manifest_parse_error_display() {
        let error = ScanError::ManifestParse {
            path: "values.yaml".to_string(),
            message: "mapping values are not allowed".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unable to load YAML file: values.yaml - mapping values are not allowed"
        );
    }

    #[test]
    fn test_missing_tag_error_display() {
        let error = ScanError::MissingTag("quay.io/org/app".to_string());
        assert_eq!(error.to_string(), "Image reference has no tag: quay.io/org/app");
    }

    #[test]
    fn test_lookup_error_display() {
        let error = ScanError::Lookup {
            registry: "docker.io".to_string(),
            message: "404 Not Found".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Registry lookup failed: docker.io - 404 Not Found"
        );
    }

    #[test]
    fn test_scanner_error_display() {
        let error = ScanError::Scanner {
            command: "grype".to_string(),
            message: "exit status 1".to_string(),
        };
        assert_eq!(error.to_string(), "Scanner command failed: grype - exit status 1");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let scan_error: ScanError = io_error.into();
        assert!(matches!(scan_error, ScanError::Io(_)));
        assert!(scan_error.to_string().contains("file not found"));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let result: std::result::Result<serde_json::Value, _> =
            serde_json::from_str("{ invalid json }");
        let scan_error: ScanError = result.unwrap_err().into();
        assert!(matches!(scan_error, ScanError::Serialization(_)));
    }

    #[test]
    fn test_serde_yaml_error_conversion() {
        let result: std::result::Result<serde_yaml::Value, _> =
            serde_yaml::from_str("invalid: yaml: content:");
        let scan_error: ScanError = result.unwrap_err().into();
        assert!(matches!(scan_error, ScanError::Serialization(_)));
    }

    #[test]
    fn test_other_error_display() {
        let error = ScanError::Other("Unknown error occurred".to_string());
        assert_eq!(error.to_string(), "Unknown error occurred");
    }
}
