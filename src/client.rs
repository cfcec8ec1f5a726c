//! HTTP page source for Socrata-style listing endpoints

use crate::config::DownloadConfig;
use crate::error::{Error, PageError};
use crate::types::{Page, PageRequest, Row};
use reqwest::StatusCode;
use url::Url;

/// Source of dataset pages
///
/// Abstracts the listing endpoint behind a trait so the fetch loop can run
/// against scripted pages in tests. The production implementation is
/// [`SodaClient`].
#[async_trait::async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch one page of rows for the half-open range `[offset, offset + limit)`
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, PageError>;
}

/// HTTP client for offset-paginated Socrata (SODA) endpoints
///
/// Issues GET requests carrying `$limit`, `$offset` and `$order` query
/// parameters and decodes JSON-array bodies into [`Page`]s. Only HTTP 200
/// counts as success; every other status becomes [`PageError::Server`].
#[derive(Debug)]
pub struct SodaClient {
    http: reqwest::Client,
    base_url: Url,
    order_key: String,
}

impl SodaClient {
    /// Build a client from configuration
    pub fn new(config: &DownloadConfig) -> Result<Self, Error> {
        let base_url = Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid base_url: {e}"),
            key: Some("base_url".to_string()),
        })?;

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to build HTTP client: {e}"),
                key: None,
            })?;

        Ok(Self {
            http,
            base_url,
            order_key: config.order_key.clone(),
        })
    }

    /// Full request URL for one page
    fn page_url(&self, request: PageRequest) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("$limit", &request.limit.to_string())
            .append_pair("$offset", &request.offset.to_string())
            .append_pair("$order", &self.order_key);
        url
    }
}

#[async_trait::async_trait]
impl PageSource for SodaClient {
    async fn fetch_page(&self, request: PageRequest) -> Result<Page, PageError> {
        let offset = request.offset;
        let url = self.page_url(request);

        tracing::debug!(%url, offset, limit = request.limit, "Requesting page");

        let response = self.http.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                PageError::Timeout { offset }
            } else {
                PageError::Transport {
                    offset,
                    reason: e.to_string(),
                }
            }
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(PageError::Server {
                offset,
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                PageError::Timeout { offset }
            } else {
                PageError::Transport {
                    offset,
                    reason: e.to_string(),
                }
            }
        })?;

        let rows: Vec<Row> = serde_json::from_slice(&body).map_err(|e| PageError::Decode {
            offset,
            reason: e.to_string(),
        })?;

        tracing::debug!(offset, rows = rows.len(), "Page decoded");

        Ok(Page { rows })
    }
}
