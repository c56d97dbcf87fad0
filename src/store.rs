//! CSV-backed table storage.
//!
//! Every operation loads the tables it needs from disk and writes its
//! artifacts back; nothing is shared in memory between operations.

use crate::error::{PayscopeError, Result};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// How column types are decided when reading a CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Scan the whole file to infer numeric columns.
    Inferred,
    /// Read every column as text.
    Text,
}

/// Locations of the files the operations read and write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub data: PathBuf,
    pub cleaned: PathBuf,
    pub lookup: PathBuf,
    pub merged: PathBuf,
    pub search_output: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            data: PathBuf::from("data.csv"),
            cleaned: PathBuf::from("cleaned_data.csv"),
            lookup: PathBuf::from("agency_codes.csv"),
            merged: PathBuf::from("merged_data.csv"),
            search_output: PathBuf::from("custom_search.csv"),
        }
    }
}

impl DataPaths {
    /// Resolve every relative path against `base`.
    pub fn under(base: &Path) -> Self {
        let d = Self::default();
        Self {
            data: base.join(d.data),
            cleaned: base.join(d.cleaned),
            lookup: base.join(d.lookup),
            merged: base.join(d.merged),
            search_output: base.join(d.search_output),
        }
    }
}

pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PayscopeError::MissingFile(path.to_path_buf()))
    }
}

pub fn load_csv(path: &Path, mode: ReadMode) -> Result<DataFrame> {
    ensure_exists(path)?;
    let options = CsvReadOptions::default().with_has_header(true);
    let options = match mode {
        ReadMode::Inferred => options.with_infer_schema_length(None),
        ReadMode::Text => options.with_infer_schema_length(Some(0)),
    };
    let df = options
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    debug!(path = %path.display(), rows = df.height(), cols = df.width(), "loaded csv");
    Ok(df)
}

/// Write `frame` to `path`, replacing any existing file only once the new
/// contents are complete.
pub fn save_csv(frame: &mut DataFrame, path: &Path) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(&dir)?;
    CsvWriter::new(tmp.as_file_mut())
        .include_header(true)
        .finish(frame)?;
    tmp.persist(path).map_err(|e| e.error)?;
    debug!(path = %path.display(), rows = frame.height(), "saved csv");
    Ok(())
}

pub fn has_column(frame: &DataFrame, column: &str) -> bool {
    frame.get_column_index(column).is_some()
}

/// Fail with [`PayscopeError::MissingColumn`] naming the first absent column.
pub fn require_columns<'a>(
    frame: &DataFrame,
    columns: impl IntoIterator<Item = &'a str>,
    path: &Path,
) -> Result<()> {
    for column in columns {
        if !has_column(frame, column) {
            return Err(PayscopeError::missing_column(column, path));
        }
    }
    Ok(())
}
