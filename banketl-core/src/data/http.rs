//! Blocking HTTP page source.
//!
//! One GET per run, no retries. Non-2xx responses are errors rather than
//! bodies to parse.

use super::source::{DataError, PageSource};
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Fetches pages over HTTP(S) with a bounded timeout.
pub struct HttpSource {
    client: reqwest::blocking::Client,
}

impl HttpSource {
    pub fn new(timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl PageSource for HttpSource {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, url: &str) -> Result<String, DataError> {
        debug!(url, "fetching page");
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(format!("reading body of {url}: {e}")))?;
        debug!(bytes = body.len(), "page fetched");
        Ok(body)
    }
}
