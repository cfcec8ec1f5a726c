//! # soda-dl
//!
//! Bulk downloader for offset-paginated Socrata (SODA) datasets.
//!
//! Pages a listing endpoint sequentially with `$limit`/`$offset`/`$order`
//! queries, persists every page as a CSV chunk the moment it arrives, and
//! merges the chunks into one combined file at the end of a full run. Pages
//! that keep failing after retries are recorded in a sidecar log instead of
//! aborting the download.
//!
//! ## Design Philosophy
//!
//! soda-dl is designed to be:
//! - **Resilient by default** - transient page failures are retried with
//!   backoff, then logged and skipped; a run never aborts over one bad page
//! - **Sensible defaults** - works out of the box against the NY MTA hourly
//!   ridership dataset with zero configuration
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Observable** - progress flows through a swappable reporter and
//!   structured `tracing` logs
//!
//! ## Quick Start
//!
//! ```no_run
//! use soda_dl::{DatasetDownloader, DownloadConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Debug mode caps the run at a few pages and keeps the chunk files
//!     let config = DownloadConfig {
//!         debug: true,
//!         ..Default::default()
//!     };
//!
//!     let downloader = DatasetDownloader::new(config)?;
//!     let report = downloader.run().await?;
//!
//!     println!(
//!         "fetched {} rows into {} chunks ({} failed pages)",
//!         report.total_fetched,
//!         report.chunk_count,
//!         report.failed_offsets.len()
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// CSV chunk persistence
pub mod chunk;
/// HTTP page source for Socrata-style endpoints
pub mod client;
/// Configuration types
pub mod config;
/// Chunk consolidation into one combined file
pub mod consolidate;
/// Error types
pub mod error;
/// Crash-safe sidecar log of failed offsets
pub mod failure_log;
/// Paginated fetch loop
pub mod fetcher;
/// Progress reporting seam
pub mod progress;
/// Retry logic with exponential backoff
pub mod retry;
/// Core types
pub mod types;

// Re-export commonly used types
pub use client::{PageSource, SodaClient};
pub use config::{DownloadConfig, RetryConfig};
pub use error::{Error, PageError, Result};
pub use failure_log::FailureLog;
pub use fetcher::DatasetDownloader;
pub use progress::{NullReporter, ProgressReporter, TracingReporter};
pub use types::{Page, PageRequest, ProgressUpdate, Row, RunReport, RunStamp, RunState};
