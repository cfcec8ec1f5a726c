//! Core types for soda-dl

use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

/// One decoded dataset row: a JSON object keyed by column name
///
/// Socrata omits keys for null cells, so rows within one page can carry
/// different key sets. Rows stay dynamic maps rather than a fixed struct, and
/// key order is preserved so CSV columns come out in API order.
pub type Row = Map<String, Value>;

/// Timestamp identifier stamped into every artifact name of one run
///
/// Formatted `%Y%m%d_%H%M%S` from local time at run start. Runs started in
/// different seconds never collide on artifact names.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunStamp(String);

impl RunStamp {
    /// Stamp for a run starting now
    pub fn now() -> Self {
        Self(Local::now().format("%Y%m%d_%H%M%S").to_string())
    }

    /// Stamp from a pre-rendered timestamp string
    pub fn from_string(stamp: impl Into<String>) -> Self {
        Self(stamp.into())
    }

    /// The timestamp string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RunStamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A page request issued to the listing endpoint
///
/// Covers the half-open row range `[offset, offset + limit)`. Immutable once
/// issued; the stable sort key accompanying it on the wire is fixed per run
/// by configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    /// Row offset the page starts at
    pub offset: u64,

    /// Maximum rows requested
    pub limit: u64,
}

/// A successfully fetched and decoded page of rows
#[derive(Clone, Debug, Default)]
pub struct Page {
    /// Decoded rows in server order
    pub rows: Vec<Row>,
}

impl Page {
    /// Number of rows in the page
    pub fn count(&self) -> u64 {
        self.rows.len() as u64
    }

    /// True when the server returned no rows at all
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Mutable state of one fetch run, owned exclusively by the loop
///
/// The loop is the only writer; nothing here is shared. Whatever must survive
/// the process is persisted separately (chunk files, the failure log).
#[derive(Clone, Debug)]
pub struct RunState {
    /// Next page offset to request
    pub offset: u64,

    /// Rows fetched across all successful pages so far
    pub total_fetched: u64,

    /// Offsets whose pages failed, in the order they failed
    pub failed_offsets: Vec<u64>,

    /// Number of chunk files written so far (also the 1-based index of the
    /// most recent chunk)
    pub chunk_index: u32,

    /// Row count the progress percentage is computed against
    pub estimated_total: u64,
}

impl RunState {
    /// Fresh state starting at offset 0
    pub fn new(estimated_total: u64) -> Self {
        Self {
            offset: 0,
            total_fetched: 0,
            failed_offsets: Vec::new(),
            chunk_index: 0,
            estimated_total,
        }
    }

    /// Advance the cursor past the page just handled
    ///
    /// Called exactly once per iteration, success or failure, so offsets form
    /// the strictly increasing sequence `0, limit, 2*limit, ...`.
    pub fn advance(&mut self, limit: u64) {
        self.offset += limit;
    }

    /// Account a successful page whose chunk was just persisted
    pub fn record_success(&mut self, count: u64) {
        self.total_fetched += count;
        self.chunk_index += 1;
    }

    /// Account a failed page
    pub fn record_failure(&mut self, offset: u64) {
        self.failed_offsets.push(offset);
    }

    /// Percent complete against the estimate, clamped to 100 and rounded to
    /// one decimal place
    ///
    /// Advisory only: the estimate can be stale, so the clamp keeps overshoot
    /// from reading as more than 100%.
    pub fn percent_complete(&self) -> f64 {
        if self.estimated_total == 0 {
            return 100.0;
        }
        let raw = self.total_fetched as f64 / self.estimated_total as f64 * 100.0;
        (raw.min(100.0) * 10.0).round() / 10.0
    }
}

/// Snapshot handed to a progress reporter after each successful page
#[derive(Clone, Copy, Debug)]
pub struct ProgressUpdate {
    /// Offset of the page just persisted
    pub offset: u64,

    /// Rows in that page
    pub page_rows: u64,

    /// Cumulative rows fetched this run
    pub total_fetched: u64,

    /// Row count the percentage is computed against
    pub estimated_total: u64,

    /// Percent complete, clamped to 100, one decimal place
    pub percent: f64,

    /// 1-based index of the chunk file just written
    pub chunk_index: u32,
}

/// Summary of a completed run
///
/// Returned by [`DatasetDownloader::run`](crate::DatasetDownloader::run) after
/// the loop reaches a terminal condition.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunReport {
    /// Timestamp identifying this run's artifacts
    pub run_stamp: RunStamp,

    /// Rows fetched across all successful pages
    pub total_fetched: u64,

    /// Number of chunk files written
    pub chunk_count: u32,

    /// Offsets whose pages failed after retries, in failure order
    pub failed_offsets: Vec<u64>,

    /// Path to the sidecar failure log, present only when pages failed
    pub failure_log: Option<PathBuf>,

    /// Path to the combined artifact, present only when consolidation ran
    pub combined_file: Option<PathBuf>,
}

impl RunReport {
    /// True when every page in the run succeeded
    pub fn is_clean(&self) -> bool {
        self.failed_offsets.is_empty()
    }
}
