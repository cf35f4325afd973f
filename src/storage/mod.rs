//! Filesystem data lake operations.
//!
//! Handles reading and writing to the local data lake:
//! - Race records as JSONL, one or more files under `records/`
//! - Track participation counts in `challenge_info.jsonl`
//! - Rendered reports under `reports/`

pub mod jsonl;

pub use jsonl::{
    append_records, load_competition_info, load_records, write_competition_info, JsonlReader,
    JsonlWriter,
};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn records_dir(&self) -> PathBuf {
        self.data_dir.join("records")
    }

    /// A named record file, e.g. `records/alice.jsonl`.
    pub fn records_file(&self, name: &str) -> Result<PathBuf, StorageError> {
        let name = name.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StorageError::InvalidPath(name.to_string()));
        }
        Ok(self.records_dir().join(format!("{}.jsonl", name)))
    }

    pub fn challenge_info_path(&self) -> PathBuf {
        self.data_dir.join("challenge_info.jsonl")
    }

    pub fn reports_dir(&self) -> PathBuf {
        self.data_dir.join("reports")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.records_dir(), PathBuf::from("/data/records"));
        assert_eq!(
            config.challenge_info_path(),
            PathBuf::from("/data/challenge_info.jsonl")
        );
        assert_eq!(config.reports_dir(), PathBuf::from("/data/reports"));
    }

    #[test]
    fn test_records_file() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(
            config.records_file("alice").unwrap(),
            PathBuf::from("/data/records/alice.jsonl")
        );
        assert!(config.records_file("../etc/passwd").is_err());
        assert!(config.records_file("").is_err());
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
