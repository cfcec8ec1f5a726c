//! Chunk consolidation
//!
//! After a full (non-debug) run that produced more than one chunk, the chunks
//! are merged into a single `{run_stamp}_complete.csv` and the per-page files
//! are removed. Debug runs and single-chunk runs skip this stage and keep the
//! chunk files as the final artifacts.

use crate::chunk;
use crate::error::Result;
use crate::types::RunStamp;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File name of the combined artifact
pub fn combined_file_name(stamp: &RunStamp) -> String {
    format!("{stamp}_complete.csv")
}

/// Full path of the combined artifact inside the output directory
pub fn combined_path(output_dir: &Path, stamp: &RunStamp) -> PathBuf {
    output_dir.join(combined_file_name(stamp))
}

/// Merge a run's chunk files into one combined CSV and delete the sources
///
/// Chunks are concatenated in ascending index order, preserving row order
/// within each chunk. A chunk file that no longer exists is skipped with a
/// warning. The combined header is the union of every chunk's columns in
/// first-appearance order; rows from chunks lacking a column get empty cells
/// there. Source chunks are deleted only after the combined file is flushed,
/// and a failed deletion is logged rather than treated as fatal.
pub fn consolidate_chunks(
    output_dir: &Path,
    stamp: &RunStamp,
    chunk_count: u32,
) -> Result<PathBuf> {
    let chunks = existing_chunks(output_dir, stamp, chunk_count);
    info!(
        chunks = chunks.len(),
        expected = chunk_count,
        "Combining chunks into a single file"
    );

    let combined = combined_path(output_dir, stamp);
    write_combined(&combined, &chunks)?;

    let deleted = remove_source_chunks(&chunks);
    info!(
        combined = %combined.display(),
        deleted_chunks = deleted,
        "Consolidation complete"
    );

    Ok(combined)
}

/// Paths of the run's chunk files that are still on disk, in index order
fn existing_chunks(output_dir: &Path, stamp: &RunStamp, chunk_count: u32) -> Vec<PathBuf> {
    let mut chunks = Vec::new();
    for index in 1..=chunk_count {
        let path = chunk::chunk_path(output_dir, stamp, index);
        if path.exists() {
            chunks.push(path);
        } else {
            warn!(path = %path.display(), "Chunk file missing, skipping");
        }
    }
    chunks
}

/// Stream every chunk's records into the combined file under a union header
fn write_combined(combined: &Path, chunks: &[PathBuf]) -> Result<()> {
    let header = combined_header(chunks)?;
    let positions: HashMap<&str, usize> = header
        .iter()
        .enumerate()
        .map(|(position, name)| (name.as_str(), position))
        .collect();

    let mut writer = csv::Writer::from_path(combined)?;
    if !header.is_empty() {
        writer.write_record(&header)?;
    }

    for chunk in chunks {
        let mut reader = csv::Reader::from_path(chunk)?;
        let chunk_headers: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        let mut appended = 0u64;

        for record in reader.records() {
            let record = record?;
            let mut cells = vec![String::new(); header.len()];
            for (name, value) in chunk_headers.iter().zip(record.iter()) {
                if let Some(&position) = positions.get(name.as_str()) {
                    cells[position] = value.to_string();
                }
            }
            writer.write_record(&cells)?;
            appended += 1;
        }

        debug!(chunk = %chunk.display(), rows = appended, "Chunk appended to combined file");
    }

    writer.flush()?;
    Ok(())
}

/// Union of every chunk's column names, in first-appearance order
fn combined_header(chunks: &[PathBuf]) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut header = Vec::new();
    for chunk in chunks {
        for name in chunk::read_headers(chunk)? {
            if seen.insert(name.clone()) {
                header.push(name);
            }
        }
    }
    Ok(header)
}

/// Delete the source chunk files, returning how many were removed
fn remove_source_chunks(chunks: &[PathBuf]) -> u32 {
    let mut deleted = 0;
    for chunk in chunks {
        match std::fs::remove_file(chunk) {
            Ok(()) => {
                debug!(path = %chunk.display(), "Deleted source chunk");
                deleted += 1;
            }
            Err(e) => {
                warn!(path = %chunk.display(), error = %e, "Failed to delete source chunk");
            }
        }
    }
    deleted
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::write_chunk;
    use crate::types::Row;
    use serde_json::json;
    use tempfile::TempDir;

    fn row(value: serde_json::Value) -> Row {
        serde_json::from_value(value).expect("test row should be an object")
    }

    fn stamp() -> RunStamp {
        RunStamp::from_string("20240101_120000")
    }

    fn lines_of(path: &Path) -> Vec<String> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(String::from)
            .collect()
    }

    #[test]
    fn combined_name_uses_the_run_stamp() {
        assert_eq!(
            combined_file_name(&stamp()),
            "20240101_120000_complete.csv"
        );
    }

    #[test]
    fn chunks_are_concatenated_in_index_order() {
        let dir = TempDir::new().unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            1,
            &[row(json!({"station": "Astoria Blvd", "ridership": "120"}))],
        )
        .unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            2,
            &[row(json!({"station": "Bowling Green", "ridership": "95"}))],
        )
        .unwrap();

        let combined = consolidate_chunks(dir.path(), &stamp(), 2).unwrap();

        let lines = lines_of(&combined);
        assert_eq!(lines[0], "station,ridership");
        assert_eq!(lines[1], "Astoria Blvd,120");
        assert_eq!(lines[2], "Bowling Green,95");
    }

    #[test]
    fn source_chunks_are_deleted_after_combining() {
        let dir = TempDir::new().unwrap();
        let first = write_chunk(
            dir.path(),
            &stamp(),
            1,
            &[row(json!({"station": "Astoria Blvd"}))],
        )
        .unwrap();
        let second = write_chunk(
            dir.path(),
            &stamp(),
            2,
            &[row(json!({"station": "Bowling Green"}))],
        )
        .unwrap();

        let combined = consolidate_chunks(dir.path(), &stamp(), 2).unwrap();

        assert!(combined.exists());
        assert!(!first.exists());
        assert!(!second.exists());
    }

    #[test]
    fn missing_chunks_are_skipped_not_fatal() {
        let dir = TempDir::new().unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            1,
            &[row(json!({"station": "Astoria Blvd"}))],
        )
        .unwrap();
        // Chunk 2 was removed by hand; chunk 3 survives.
        write_chunk(
            dir.path(),
            &stamp(),
            3,
            &[row(json!({"station": "Canal St"}))],
        )
        .unwrap();

        let combined = consolidate_chunks(dir.path(), &stamp(), 3).unwrap();

        let lines = lines_of(&combined);
        assert_eq!(lines, vec!["station", "Astoria Blvd", "Canal St"]);
    }

    #[test]
    fn chunks_with_different_columns_merge_under_a_union_header() {
        let dir = TempDir::new().unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            1,
            &[row(json!({"station": "Astoria Blvd", "ridership": "120"}))],
        )
        .unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            2,
            &[row(json!({"station": "Bowling Green", "transfers": "3"}))],
        )
        .unwrap();

        let combined = consolidate_chunks(dir.path(), &stamp(), 2).unwrap();

        let lines = lines_of(&combined);
        assert_eq!(lines[0], "station,ridership,transfers");
        assert_eq!(lines[1], "Astoria Blvd,120,");
        assert_eq!(lines[2], "Bowling Green,,3");
    }

    #[test]
    fn quoted_fields_survive_consolidation() {
        let dir = TempDir::new().unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            1,
            &[row(json!({"station": "Court Sq, Long Island City", "ridership": "42"}))],
        )
        .unwrap();
        write_chunk(
            dir.path(),
            &stamp(),
            2,
            &[row(json!({"station": "Bowling Green", "ridership": "95"}))],
        )
        .unwrap();

        let combined = consolidate_chunks(dir.path(), &stamp(), 2).unwrap();

        let mut reader = csv::Reader::from_path(&combined).unwrap();
        let first = reader.records().next().unwrap().unwrap();
        assert_eq!(&first[0], "Court Sq, Long Island City");
    }

    #[test]
    fn no_surviving_chunks_still_produces_an_empty_artifact() {
        let dir = TempDir::new().unwrap();
        let combined = consolidate_chunks(dir.path(), &stamp(), 2).unwrap();
        assert!(combined.exists());
        assert_eq!(std::fs::read_to_string(&combined).unwrap(), "");
    }
}
