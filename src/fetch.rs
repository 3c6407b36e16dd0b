use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::Settings;

const BASE_BACKOFF_MS: u64 = 500;

/// A fetched body, not yet decoded.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Where the body was served from, after any redirects.
    pub url: String,
    pub status: u16,
    pub body: Vec<u8>,
    pub latency_ms: u64,
}

/// HTTP collaborator that hands pages to the extraction core.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    retries: u32,
}

impl Fetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.clone())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            retries: settings.fetch_retries,
        })
    }

    /// GET `url`, retrying rate limits and server errors with exponential
    /// backoff. Any other non-success status is an error.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage> {
        let mut attempt = 0;
        loop {
            let start = Instant::now();
            let response = self
                .client
                .get(url)
                .send()
                .await
                .with_context(|| format!("Request to {} failed", url))?;
            let status = response.status();

            if should_retry(status) && attempt < self.retries {
                let delay = backoff(attempt);
                warn!(
                    "HTTP {} from {} (attempt {}/{}), backing off {:.1}s",
                    status.as_u16(),
                    url,
                    attempt + 1,
                    self.retries,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                anyhow::bail!("HTTP {} from {}", status.as_u16(), url);
            }

            let final_url = response.url().to_string();
            let body = response
                .bytes()
                .await
                .with_context(|| format!("Failed to read body from {}", url))?;
            let latency_ms = start.elapsed().as_millis() as u64;
            debug!(url, final_url = %final_url, bytes = body.len(), latency_ms, "Fetched page");

            return Ok(FetchedPage {
                url: final_url,
                status: status.as_u16(),
                body: body.to_vec(),
                latency_ms,
            });
        }
    }

    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let page = self.fetch(url).await?;
        Ok(String::from_utf8_lossy(&page.body).into_owned())
    }
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn backoff(attempt: u32) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS * 2u64.pow(attempt))
}
