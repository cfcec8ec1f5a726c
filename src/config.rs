//! Configuration types for soda-dl

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level configuration for a dataset download run
///
/// Every field carries a serde default tuned for the NY MTA hourly ridership
/// dataset, so `DownloadConfig::default()` is a working configuration and a
/// JSON config file only needs to name the fields it overrides.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadConfig {
    /// Base URL of the paginated JSON listing endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Rows requested per page (default: 45 000; Socrata caps a request at 50 000)
    #[serde(default = "default_page_size")]
    pub page_size: u64,

    /// Stable sort key sent as `$order` (default: ":id")
    ///
    /// Pagination over a mutating backing store is only consistent when every
    /// request orders by the same unique field.
    #[serde(default = "default_order_key")]
    pub order_key: String,

    /// Directory chunk files and the failure log are written to (default: "./mta_data")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Per-request timeout (default: 60 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    pub request_timeout: Duration,

    /// Fixed delay between page requests (default: 1 second)
    #[serde(default = "default_page_delay", with = "duration_serde")]
    pub page_delay: Duration,

    /// Debug mode: cap total rows at `debug_page_count * page_size` and keep
    /// chunk files instead of consolidating them (default: false)
    #[serde(default)]
    pub debug: bool,

    /// Number of full pages the debug cap allows (default: 3)
    #[serde(default = "default_debug_page_count")]
    pub debug_page_count: u32,

    /// Published row count of the dataset (default: 110 696 365)
    ///
    /// Sizes the progress estimate. An inaccurate value skews the reported
    /// percentage, nothing else; the debug cap ignores it.
    #[serde(default = "default_total_rows")]
    pub total_rows: u64,

    /// Retry behavior for transient page failures
    #[serde(default)]
    pub retry: RetryConfig,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            page_size: default_page_size(),
            order_key: default_order_key(),
            output_dir: default_output_dir(),
            request_timeout: default_request_timeout(),
            page_delay: default_page_delay(),
            debug: false,
            debug_page_count: default_debug_page_count(),
            total_rows: default_total_rows(),
            retry: RetryConfig::default(),
        }
    }
}

impl DownloadConfig {
    /// Row cap applied in debug mode
    pub fn debug_cap(&self) -> u64 {
        u64::from(self.debug_page_count) * self.page_size
    }

    /// Row count the progress percentage is computed against
    ///
    /// Debug runs estimate against the cap so a capped run still reads 100%.
    pub fn estimated_total(&self) -> u64 {
        if self.debug {
            self.debug_cap().min(self.total_rows)
        } else {
            self.total_rows
        }
    }
}

/// Retry configuration for transient page failures
///
/// `max_attempts` counts retries beyond the first try: a page is requested at
/// most `max_attempts + 1` times before it is recorded as failed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum retries after the initial attempt (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before the first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
            jitter: true,
        }
    }
}

fn default_base_url() -> String {
    "https://data.ny.gov/resource/wujg-7c2s.json".to_string()
}

fn default_page_size() -> u64 {
    45_000
}

fn default_order_key() -> String {
    ":id".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("./mta_data")
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_page_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_debug_page_count() -> u32 {
    3
}

fn default_total_rows() -> u64 {
    110_696_365
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_true() -> bool {
    true
}

// Duration serialization helper
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}
