//! Paginated fetch loop
//!
//! [`DatasetDownloader`] drives a single sequential stream of page requests
//! against an offset-paginated listing endpoint, persists every successful
//! page as a CSV chunk, and records failed offsets without aborting the run.
//! After the loop it optionally consolidates the chunks into one combined
//! file.
//!
//! The loop owns all mutable run state: nothing is shared, nothing is
//! concurrent. Suspension happens only inside the page request (bounded by
//! the configured timeout), in retry backoff, and in the fixed inter-page
//! delay.

use crate::chunk;
use crate::client::{PageSource, SodaClient};
use crate::config::DownloadConfig;
use crate::consolidate::consolidate_chunks;
use crate::error::{Error, Result};
use crate::failure_log::FailureLog;
use crate::progress::{ProgressReporter, TracingReporter};
use crate::retry::fetch_with_retry;
use crate::types::{PageRequest, ProgressUpdate, RunReport, RunStamp, RunState};
use std::sync::Arc;
use tracing::{info, warn};


/// Sequential dataset downloader
///
/// Construct with [`DatasetDownloader::new`] for the HTTP-backed client, or
/// [`DatasetDownloader::with_source`] to run the loop against any
/// [`PageSource`]. Progress goes to a [`TracingReporter`] unless swapped via
/// [`DatasetDownloader::with_reporter`].
pub struct DatasetDownloader {
    config: DownloadConfig,
    source: Arc<dyn PageSource>,
    reporter: Arc<dyn ProgressReporter>,
}

impl DatasetDownloader {
    /// Build a downloader that fetches pages over HTTP
    pub fn new(config: DownloadConfig) -> Result<Self> {
        let client = SodaClient::new(&config)?;
        Self::with_source(config, Arc::new(client))
    }

    /// Build a downloader over an arbitrary page source
    pub fn with_source(config: DownloadConfig, source: Arc<dyn PageSource>) -> Result<Self> {
        if config.page_size == 0 {
            return Err(Error::Config {
                message: "page_size must be greater than zero".to_string(),
                key: Some("page_size".to_string()),
            });
        }

        Ok(Self {
            config,
            source,
            reporter: Arc::new(TracingReporter),
        })
    }

    /// Replace the progress reporter
    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Run the full download
    ///
    /// Phases per iteration:
    /// 1. Fetch the page at the current offset, retrying transient failures
    /// 2. Empty page: the dataset is exhausted, stop without writing a chunk
    /// 3. Persist the page as the next chunk, update counters, report progress
    /// 4. Terminal checks: debug cap, then short page
    /// 5. Fixed delay before the next request
    ///
    /// A page that still fails after retries is appended to the sidecar
    /// failure log and skipped; the offset advances regardless, so the
    /// request sequence stays `0, page_size, 2*page_size, ...`. Only
    /// filesystem failures abort the run.
    pub async fn run(&self) -> Result<RunReport> {
        let config = &self.config;
        std::fs::create_dir_all(&config.output_dir)?;

        let stamp = RunStamp::now();
        let failure_log = FailureLog::new(&config.output_dir, &stamp);
        let mut state = RunState::new(config.estimated_total());
        let limit = config.page_size;

        info!(
            base_url = %config.base_url,
            page_size = limit,
            debug = config.debug,
            estimated_total = state.estimated_total,
            run_stamp = %stamp,
            "Starting dataset download"
        );

        loop {
            let request = PageRequest {
                offset: state.offset,
                limit,
            };

            // Phase 1: fetch, retrying transient failures in place
            let outcome =
                fetch_with_retry(&config.retry, || self.source.fetch_page(request)).await;

            let page = match outcome {
                Ok(page) => page,
                Err(e) => {
                    // The page is lost for this run; record it and move on
                    warn!(
                        error = %e,
                        offset = state.offset,
                        "Page failed, continuing with next offset"
                    );
                    failure_log.append(state.offset)?;
                    state.record_failure(state.offset);
                    state.advance(limit);
                    continue;
                }
            };

            // Phase 2: an empty page means the dataset ended at the previous page
            if page.is_empty() {
                info!(offset = state.offset, "No more data available");
                break;
            }

            // Phase 3: persist the chunk, then update counters
            let rows = page.count();
            chunk::write_chunk(&config.output_dir, &stamp, state.chunk_index + 1, &page.rows)?;
            state.record_success(rows);
            state.advance(limit);

            self.reporter.page_complete(&ProgressUpdate {
                offset: request.offset,
                page_rows: rows,
                total_fetched: state.total_fetched,
                estimated_total: state.estimated_total,
                percent: state.percent_complete(),
                chunk_index: state.chunk_index,
            });

            // Phase 4: terminal checks; the debug cap wins over the short page
            if config.debug && state.total_fetched >= config.debug_cap() {
                info!(
                    total_fetched = state.total_fetched,
                    "Debug cap reached, stopping"
                );
                break;
            }
            if rows < limit {
                info!(rows, "Reached last page of data");
                break;
            }

            // Phase 5: fixed pause so the endpoint is not hammered
            tokio::time::sleep(config.page_delay).await;
        }

        self.finish(stamp, state, &failure_log)
    }

    /// Finalize the failure log, consolidate chunks, and build the report
    fn finish(
        &self,
        stamp: RunStamp,
        state: RunState,
        failure_log: &FailureLog,
    ) -> Result<RunReport> {
        let config = &self.config;

        if !state.failed_offsets.is_empty() {
            warn!(
                failed = state.failed_offsets.len(),
                log = %failure_log.path().display(),
                "Some pages failed; their offsets are saved for a later re-fetch"
            );
        }
        failure_log.finalize(&state.failed_offsets)?;

        // Chunks merge into one file only for full runs with several chunks
        let combined_file = if !config.debug && state.chunk_index > 1 {
            Some(consolidate_chunks(
                &config.output_dir,
                &stamp,
                state.chunk_index,
            )?)
        } else {
            None
        };

        let failure_log_path = (!state.failed_offsets.is_empty())
            .then(|| failure_log.path().to_path_buf());

        let report = RunReport {
            run_stamp: stamp,
            total_fetched: state.total_fetched,
            chunk_count: state.chunk_index,
            failed_offsets: state.failed_offsets,
            failure_log: failure_log_path,
            combined_file,
        };

        info!(
            total_fetched = report.total_fetched,
            chunks = report.chunk_count,
            failed = report.failed_offsets.len(),
            "Download complete"
        );

        Ok(report)
    }
}
