//! Progress reporting seam for the fetch loop

use crate::types::ProgressUpdate;

/// Observer invoked after each successfully persisted page
///
/// Reporting is advisory: implementations see a snapshot and must not
/// influence control flow. The default is [`TracingReporter`]; swap in
/// [`NullReporter`] to silence a run.
pub trait ProgressReporter: Send + Sync {
    /// Called once per persisted chunk with a snapshot of run progress
    fn page_complete(&self, update: &ProgressUpdate);
}

/// Reporter that logs each page through tracing
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingReporter;

impl ProgressReporter for TracingReporter {
    fn page_complete(&self, update: &ProgressUpdate) {
        tracing::info!(
            chunk = update.chunk_index,
            rows = update.page_rows,
            total_fetched = update.total_fetched,
            estimated_total = update.estimated_total,
            percent = update.percent,
            "Page persisted"
        );
    }
}

/// Reporter that discards all updates
#[derive(Clone, Copy, Debug, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn page_complete(&self, _update: &ProgressUpdate) {}
}
