//! CSV chunk persistence
//!
//! One chunk file per successful page, named `{run_stamp}_chunk{index}.csv`
//! with a 1-based index. Chunks are immutable once written; the consolidator
//! reads them back and merges them into the combined artifact.

use crate::error::Result;
use crate::types::{Row, RunStamp};
use serde_json::Value;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// File name of one chunk
pub fn chunk_file_name(stamp: &RunStamp, index: u32) -> String {
    format!("{stamp}_chunk{index}.csv")
}

/// Full path of one chunk inside the output directory
pub fn chunk_path(output_dir: &Path, stamp: &RunStamp, index: u32) -> PathBuf {
    output_dir.join(chunk_file_name(stamp, index))
}

/// Column header for a set of rows: every key in first-appearance order
///
/// Socrata omits keys for null cells, so later rows can introduce columns the
/// first row lacks.
pub fn header_union(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut headers = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.clone()) {
                headers.push(key.clone());
            }
        }
    }
    headers
}

/// Render a JSON cell as a CSV field
///
/// Strings pass through as-is, null and missing keys become empty cells, and
/// anything else keeps its JSON rendering.
fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Persist one page of rows as a chunk file, returning the path written
///
/// The header is the union of keys across the page's rows; a row lacking a
/// column gets an empty cell. The fetch loop never persists an empty page,
/// but an empty slice still produces a valid (empty) file.
pub fn write_chunk(
    output_dir: &Path,
    stamp: &RunStamp,
    index: u32,
    rows: &[Row],
) -> Result<PathBuf> {
    let path = chunk_path(output_dir, stamp, index);
    let mut writer = csv::Writer::from_path(&path)?;

    if !rows.is_empty() {
        let headers = header_union(rows);
        writer.write_record(&headers)?;
        for row in rows {
            let record: Vec<String> = headers.iter().map(|h| cell_text(row.get(h))).collect();
            writer.write_record(&record)?;
        }
    }
    writer.flush()?;

    tracing::debug!(path = %path.display(), rows = rows.len(), "Chunk written");

    Ok(path)
}

/// Header row of an existing chunk file
pub fn read_headers(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.iter().map(String::from).collect();
    Ok(headers)
}
