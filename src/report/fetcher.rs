//! Remote logo download.
//!
//! Some logo hosts answer 406 to clients that do not look like a browser, so
//! requests carry a browser user agent and an image `Accept` header.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const IMAGE_ACCEPT: &str = "image/avif,image/webp,image/apng,image/*,*/*;q=0.8";

#[derive(Clone)]
pub struct LogoFetcher {
    client: reqwest::Client,
}

impl LogoFetcher {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(IMAGE_ACCEPT));

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(BROWSER_USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client })
    }

    /// Download `url`. Every failure is logged and reported as `None`.
    pub async fn fetch(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Logo download from {} failed: {}", url, e);
                return None;
            }
        };

        let response = match response.error_for_status() {
            Ok(response) => response,
            Err(e) => {
                log::warn!("Logo host rejected request for {}: {}", url, e);
                return None;
            }
        };

        match response.bytes().await {
            Ok(body) => {
                log::debug!("Downloaded logo from {} ({} bytes)", url, body.len());
                Some(body.to_vec())
            }
            Err(e) => {
                log::warn!("Failed to read logo body from {}: {}", url, e);
                None
            }
        }
    }
}
