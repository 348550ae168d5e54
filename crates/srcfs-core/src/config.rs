//! Reader configuration loaded from JSON

use crate::error::{ConfigError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Search roots and allow-list for a [`FileReader`](crate::FileReader).
///
/// ```json
/// {
///   "basePath": "/project",
///   "includePaths": ["/project/node_modules"],
///   "allowedDirectories": ["/shared"]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReaderConfig {
    /// Empty means "no base path"; names are then relative to the working directory
    pub base_path: PathBuf,
    pub include_paths: Vec<PathBuf>,
    pub allowed_directories: Vec<PathBuf>,
}

impl ReaderConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading reader config from {:?}", path);
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Reject configurations that the reader would treat as programming errors
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if !self.include_paths.is_empty() && self.base_path.as_os_str().is_empty() {
            return Err(ConfigError::IncludePathWithoutBasePath);
        }
        if self.include_paths.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::EmptyIncludePath);
        }
        if self.allowed_directories.iter().any(|p| p.as_os_str().is_empty()) {
            return Err(ConfigError::EmptyAllowedDirectory);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let config = ReaderConfig::from_json_str(
            r#"{"basePath": "/project", "includePaths": ["/libs"], "allowedDirectories": ["/shared"]}"#,
        )
        .unwrap();

        assert_eq!(config.base_path, PathBuf::from("/project"));
        assert_eq!(config.include_paths, vec![PathBuf::from("/libs")]);
        assert_eq!(config.allowed_directories, vec![PathBuf::from("/shared")]);
    }

    #[test]
    fn test_missing_fields_default() {
        let config = ReaderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ReaderConfig::default());
    }

    #[test]
    fn test_include_paths_need_base_path() {
        let err = ReaderConfig::from_json_str(r#"{"includePaths": ["/libs"]}"#).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::IncludePathWithoutBasePath)
        ));
    }

    #[test]
    fn test_empty_allowed_directory_rejected() {
        let err = ReaderConfig::from_json_str(r#"{"allowedDirectories": [""]}"#).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::EmptyAllowedDirectory)));
    }

    #[test]
    fn test_invalid_json() {
        let err = ReaderConfig::from_json_str("{").unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("srcfs.json");
        std::fs::write(&path, r#"{"basePath": "contracts"}"#).unwrap();

        let config = ReaderConfig::from_json_file(&path).unwrap();
        assert_eq!(config.base_path, PathBuf::from("contracts"));
    }
}
