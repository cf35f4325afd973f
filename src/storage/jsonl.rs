//! JSONL (JSON Lines) storage.
//!
//! JSONL is the source of truth for records and challenge info.
//! Each line is a valid JSON object representing one entity.

use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info, warn};

use super::{StorageConfig, StorageError};
use crate::models::{ChallengeCompetitionInfo, ChallengeInfo, Record};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Ensure the parent directory exists.
    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    /// Append multiple entities to the file.
    pub fn append_batch(&self, entities: &[T]) -> Result<usize, StorageError> {
        if entities.is_empty() {
            return Ok(0);
        }

        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Appended {} entities to {:?}", count, self.path);

        Ok(count)
    }

    /// Write entities, replacing the entire file.
    pub fn write_all(&self, entities: &[T]) -> Result<usize, StorageError> {
        self.ensure_dir()?;

        let file = File::create(&self.path)?;
        let mut writer = BufWriter::new(file);
        let mut count = 0;

        for entity in entities {
            let json = serde_json::to_string(entity)?;
            writeln!(writer, "{}", json)?;
            count += 1;
        }

        writer.flush()?;
        info!("Wrote {} entities to {:?}", count, self.path);

        Ok(count)
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Check if the file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Read all entities from the file. Unparsable lines are logged and skipped.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut entities = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} entities from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Every `*.jsonl` file under `records/`, sorted by path.
pub fn record_files(config: &StorageConfig) -> Result<Vec<PathBuf>, StorageError> {
    let pattern = config.records_dir().join("*.jsonl");
    let pattern = pattern
        .to_str()
        .ok_or_else(|| StorageError::InvalidPath(pattern.display().to_string()))?;

    let mut files = Vec::new();
    for entry in glob::glob(pattern)? {
        match entry {
            Ok(path) => files.push(path),
            Err(e) => warn!("Skipping unreadable record file: {}", e),
        }
    }
    files.sort();
    Ok(files)
}

/// Load and merge all record files.
///
/// A record id seen in an earlier file wins over later copies, so
/// overlapping imports never double count.
pub fn load_records(config: &StorageConfig) -> Result<Vec<Record>, StorageError> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    let mut duplicates = 0usize;

    for path in record_files(config)? {
        for record in JsonlReader::<Record>::new(path).read_all()? {
            if seen.insert(record.id.clone()) {
                records.push(record);
            } else {
                duplicates += 1;
            }
        }
    }

    info!(
        records = records.len(),
        duplicates, "Loaded records from {:?}", config.records_dir()
    );
    Ok(records)
}

/// Append records to `records/<file_name>.jsonl`, skipping any whose id is
/// already stored in any record file or repeated within the batch.
pub fn append_records(
    config: &StorageConfig,
    file_name: &str,
    records: &[Record],
) -> Result<usize, StorageError> {
    let path = config.records_file(file_name)?;
    let mut known: HashSet<_> = load_records(config)?.into_iter().map(|r| r.id).collect();

    let fresh: Vec<Record> = records
        .iter()
        .filter(|r| known.insert(r.id.clone()))
        .cloned()
        .collect();

    let skipped = records.len() - fresh.len();
    if skipped > 0 {
        debug!("Skipping {} already stored records", skipped);
    }
    JsonlWriter::new(path).append_batch(&fresh)
}

/// Load track participation counts. A missing file means no track is known.
pub fn load_competition_info(
    config: &StorageConfig,
) -> Result<ChallengeCompetitionInfo, StorageError> {
    let rows: Vec<ChallengeInfo> = JsonlReader::new(config.challenge_info_path()).read_all()?;
    Ok(rows.into_iter().collect())
}

/// Replace the stored track participation counts, sorted by track name.
pub fn write_competition_info(
    config: &StorageConfig,
    rows: &mut [ChallengeInfo],
) -> Result<usize, StorageError> {
    rows.sort_by(|a, b| a.challenge_name.cmp(&b.challenge_name));
    JsonlWriter::new(config.challenge_info_path()).write_all(rows)
}
