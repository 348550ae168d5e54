//! Error types for srcfs core

use thiserror::Error;

/// Main error type for fallible srcfs operations (configuration loading)
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Invalid user-supplied reader configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("include paths require a non-empty base path")]
    IncludePathWithoutBasePath,

    #[error("include path must not be empty")]
    EmptyIncludePath,

    #[error("allowed directory must not be empty")]
    EmptyAllowedDirectory,
}

/// Failure of a single read callback invocation.
///
/// The `Display` output of each variant is the exact message handed back to
/// the compiler pipeline.
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("File outside of allowed directories.")]
    OutsideAllowedDirectories,

    #[error("File not found.")]
    FileNotFound,

    #[error("Not a valid file.")]
    NotAValidFile,

    #[error("Exception in read callback: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown exception in read callback.")]
    Unknown,
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_read_error_messages() {
        assert_eq!(
            ReadError::OutsideAllowedDirectories.to_string(),
            "File outside of allowed directories."
        );
        assert_eq!(ReadError::FileNotFound.to_string(), "File not found.");
        assert_eq!(ReadError::NotAValidFile.to_string(), "Not a valid file.");
        assert_eq!(
            ReadError::Unknown.to_string(),
            "Unknown exception in read callback."
        );
    }

    #[test]
    fn test_io_error_is_prefixed() {
        let err = ReadError::from(io::Error::new(io::ErrorKind::PermissionDenied, "denied"));
        assert_eq!(err.to_string(), "Exception in read callback: denied");
    }

    #[test]
    fn test_config_error_wraps() {
        let err = Error::from(ConfigError::IncludePathWithoutBasePath);
        assert!(err.to_string().starts_with("Configuration error:"));
    }
}
