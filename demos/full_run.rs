//! Full download example
//!
//! This example downloads the complete MTA hourly ridership dataset
//! (110+ million rows, several hours at the default pacing):
//! - Running with the default configuration
//! - Tuning the retry policy
//! - Inspecting the consolidated output file

use soda_dl::{DatasetDownloader, DownloadConfig, RetryConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging (optional)
    // Uncomment if you add tracing-subscriber to your dependencies:
    // tracing_subscriber::fmt::init();

    // Defaults target the MTA dataset; a patient retry policy suits a run
    // that is expected to take hours anyway
    let config = DownloadConfig {
        output_dir: "mta_data".into(),
        retry: RetryConfig {
            max_attempts: 5,
            initial_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
            ..Default::default()
        },
        ..Default::default()
    };

    println!("Starting full dataset download into ./mta_data ...");
    println!("(this fetches 110M+ rows; expect several hours)");

    let report = DatasetDownloader::new(config)?.run().await?;

    println!("✓ Run {} finished", report.run_stamp);
    println!("  rows fetched: {}", report.total_fetched);
    match &report.combined_file {
        Some(path) => println!("  combined file: {}", path.display()),
        None => println!("  chunk files:  {}", report.chunk_count),
    }
    if !report.is_clean() {
        println!(
            "✗ {} pages failed; re-fetch the offsets in {:?}",
            report.failed_offsets.len(),
            report.failure_log
        );
    }

    Ok(())
}
