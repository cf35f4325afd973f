//! Import of raw record rows from CSV/TSV exports.
//!
//! The header row decides the layout (see [`RowLayout::from_headers`]). Files
//! exported from a player's record page have no login column, so the caller
//! names the player. Malformed rows are logged and skipped; they never reach
//! the calculation engine.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, Trim};
use thiserror::Error;
use tracing::{info, warn};

use crate::calculate::{normalize_row, RowLayout};
use crate::models::{ChallengeInfo, Record};
use crate::storage::{self, StorageConfig, StorageError};

/// Errors that can occur while importing.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Rows carry no player login; pass the player explicitly")]
    MissingPlayer,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// How to read an import file.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Player for files without a login column
    pub player_id: Option<String>,
    /// Field separator; `.tsv` files always use tabs
    pub delimiter: u8,
    /// Record file to append to (`records/<name>.jsonl`); defaults to the
    /// player, then to the input file stem
    pub target: Option<String>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            player_id: None,
            delimiter: b',',
            target: None,
        }
    }
}

/// What an import did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub rows_read: usize,
    pub rows_skipped: usize,
    pub records_appended: usize,
}

/// Parse rows from any reader into records.
///
/// Returns the records and the number of rows skipped as unusable.
pub fn parse_records<R: Read>(
    reader: R,
    delimiter: u8,
    player_id: Option<&str>,
) -> Result<(Vec<Record>, usize), IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let layout = RowLayout::from_headers(&headers);
    if layout.track.is_none() {
        return Err(IngestError::MissingColumn("Challenge"));
    }
    if !layout.has_player() && player_id.map_or(true, |p| p.trim().is_empty()) {
        return Err(IngestError::MissingPlayer);
    }
    let fallback = player_id.unwrap_or("").trim();

    let mut records = Vec::new();
    let mut skipped = 0;
    for (index, row) in reader.records().enumerate() {
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping malformed row {}: {}", line, e);
                skipped += 1;
                continue;
            }
        };

        let fields: Vec<&str> = row.iter().collect();
        let record = normalize_row(&fields, &layout, fallback);
        if record.player_id.is_empty() || record.track_id.is_empty() {
            warn!("Skipping row {} without player or track", line);
            skipped += 1;
            continue;
        }
        records.push(record);
    }

    Ok((records, skipped))
}

fn delimiter_for(path: &Path, default: u8) -> u8 {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => default,
    }
}

fn open(path: &Path) -> Result<std::fs::File, IngestError> {
    std::fs::File::open(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Import one CSV/TSV file into the record store.
pub fn import_file(
    config: &StorageConfig,
    path: &Path,
    options: &ImportOptions,
) -> Result<ImportSummary, IngestError> {
    info!("Importing records from {:?}", path);

    let delimiter = delimiter_for(path, options.delimiter);
    let (records, rows_skipped) =
        parse_records(open(path)?, delimiter, options.player_id.as_deref())?;

    let target = options
        .target
        .clone()
        .or_else(|| options.player_id.clone())
        .or_else(|| path.file_stem().and_then(|s| s.to_str()).map(str::to_string))
        .ok_or_else(|| StorageError::InvalidPath(path.display().to_string()))?;

    let records_appended = storage::append_records(config, &target, &records)?;
    let summary = ImportSummary {
        rows_read: records.len() + rows_skipped,
        rows_skipped,
        records_appended,
    };
    info!(
        rows = summary.rows_read,
        skipped = summary.rows_skipped,
        appended = summary.records_appended,
        "Imported {:?}",
        path
    );
    Ok(summary)
}

/// Merge track participation counts from a `challenge_name,total_records` CSV
/// into the stored challenge info. Imported values replace stored ones.
pub fn import_challenge_info(config: &StorageConfig, path: &Path) -> Result<usize, IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_for(path, b','))
        .trim(Trim::All)
        .from_reader(open(path)?);

    let mut merged: BTreeMap<String, i64> = storage::JsonlReader::<ChallengeInfo>::new(
        config.challenge_info_path(),
    )
    .read_all()?
    .into_iter()
    .map(|row| (row.challenge_name, row.total_records))
    .collect();

    let mut imported = 0;
    for row in reader.deserialize::<ChallengeInfo>() {
        match row {
            Ok(row) => {
                merged.insert(row.challenge_name, row.total_records);
                imported += 1;
            }
            Err(e) => warn!("Skipping challenge info row: {}", e),
        }
    }

    let mut rows: Vec<ChallengeInfo> = merged
        .into_iter()
        .map(|(challenge_name, total_records)| ChallengeInfo {
            challenge_name,
            total_records,
        })
        .collect();
    storage::write_competition_info(config, &mut rows)?;
    info!("Imported {} challenge info rows from {:?}", imported, path);
    Ok(imported)
}
