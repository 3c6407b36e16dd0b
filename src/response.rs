use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::ExtractConfig;
use crate::parser::process_document;
use crate::profile::{ExtractedProfile, RawDocument};

/// Request shape accepted by the service layer.
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractRequest {
    pub url: String,
    pub html: String,
}

/// `{success, content | error, latencyMs}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ExtractedProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl ExtractResponse {
    pub fn ok(content: ExtractedProfile, started: Instant) -> Self {
        Self {
            success: true,
            content: Some(content),
            error: None,
            latency_ms: elapsed_ms(started),
        }
    }

    pub fn failure(error: impl ToString, started: Instant) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.to_string()),
            latency_ms: elapsed_ms(started),
        }
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

/// Decode and extract raw response bytes into an envelope.
pub fn respond(url: &str, body: &[u8], config: &ExtractConfig) -> ExtractResponse {
    let started = Instant::now();
    match RawDocument::from_bytes(url, body) {
        Ok(doc) => ExtractResponse::ok(process_document(&doc, config).profile, started),
        Err(e) => {
            warn!(url, error = %e, "Rejected document");
            ExtractResponse::failure(e, started)
        }
    }
}

/// Extract an already-decoded request. The HTML is text by construction, so
/// it goes to the pipeline as is.
pub fn respond_to(request: &ExtractRequest, config: &ExtractConfig) -> ExtractResponse {
    let started = Instant::now();
    let doc = RawDocument::new(request.url.as_str(), request.html.as_str());
    ExtractResponse::ok(process_document(&doc, config).profile, started)
}

/// One line of crawl output: the page URL alongside its envelope.
#[derive(Debug, Clone, Serialize)]
pub struct CrawlRecord {
    pub url: String,
    #[serde(flatten)]
    pub response: ExtractResponse,
}
