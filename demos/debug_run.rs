//! Debug download example
//!
//! This example demonstrates a capped test run against the MTA hourly
//! ridership dataset:
//! - Enabling debug mode (three pages, chunks kept on disk)
//! - Watching progress through a custom reporter
//! - Reading the final run report

use soda_dl::{DatasetDownloader, DownloadConfig, ProgressReporter, ProgressUpdate};
use std::sync::Arc;

/// Reporter that prints one line per persisted page
struct PrintlnReporter;

impl ProgressReporter for PrintlnReporter {
    fn page_complete(&self, update: &ProgressUpdate) {
        println!(
            "⬇ Chunk {}: {} rows at offset {} ({:.1}% of {})",
            update.chunk_index,
            update.page_rows,
            update.offset,
            update.percent,
            update.estimated_total
        );
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Debug mode caps the run at debug_page_count full pages
    let config = DownloadConfig {
        debug: true,
        page_size: 1_000,
        output_dir: "mta_data_debug".into(),
        ..Default::default()
    };

    let downloader =
        DatasetDownloader::new(config)?.with_reporter(Arc::new(PrintlnReporter));

    println!("Starting capped debug run (3 pages of 1000 rows)...");
    let report = downloader.run().await?;

    println!("✓ Run {} finished", report.run_stamp);
    println!("  rows fetched: {}", report.total_fetched);
    println!("  chunk files:  {}", report.chunk_count);
    if report.is_clean() {
        println!("  no failed pages");
    } else {
        println!(
            "✗ {} pages failed, offsets logged to {:?}",
            report.failed_offsets.len(),
            report.failure_log
        );
    }

    Ok(())
}
