//! Test configuration helpers for building downloaders against mock servers

use soda_dl::{DownloadConfig, RetryConfig};
use std::path::Path;
use std::time::Duration;

/// Config pointed at a mock server, writing into `output_dir`
///
/// Small pages, no inter-page delay, retries off. Scenarios that exercise
/// retry behavior override `retry` themselves.
pub fn loop_config(server_uri: &str, output_dir: &Path) -> DownloadConfig {
    DownloadConfig {
        base_url: format!("{server_uri}/resource/test.json"),
        page_size: 3,
        output_dir: output_dir.to_path_buf(),
        request_timeout: Duration::from_secs(5),
        page_delay: Duration::ZERO,
        retry: no_retry(),
        ..Default::default()
    }
}

/// Retry policy that never retries
pub fn no_retry() -> RetryConfig {
    RetryConfig {
        max_attempts: 0,
        initial_delay: Duration::from_millis(1),
        jitter: false,
        ..Default::default()
    }
}

/// Retry policy with `max_attempts` retries and millisecond backoff
pub fn fast_retry(max_attempts: u32) -> RetryConfig {
    RetryConfig {
        max_attempts,
        initial_delay: Duration::from_millis(1),
        max_delay: Duration::from_millis(10),
        jitter: false,
        ..Default::default()
    }
}
