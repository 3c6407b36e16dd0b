use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::Deserialize;

pub const DEFAULT_MAX_CONTENT_SIZE: usize = 10_485_760;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 5;
const DEFAULT_FETCH_RETRIES: u32 = 3;
const DEFAULT_FETCH_CONCURRENCY: usize = 10;

/// Limits the extraction pipeline reads. Passed in explicitly so parallel
/// calls never share mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractConfig {
    /// Byte ceiling applied to `rawHtml` and `plainText`.
    pub max_content_size: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            max_content_size: DEFAULT_MAX_CONTENT_SIZE,
        }
    }
}

/// Service settings, read from the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub max_content_size: usize,
    pub request_timeout_secs: u64,
    pub fetch_retries: u32,
    pub fetch_concurrency: usize,
    pub user_agent: String,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::default().try_parsing(true))
    }

    fn load(env: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("max_content_size", DEFAULT_MAX_CONTENT_SIZE as i64)?
            .set_default("request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS as i64)?
            .set_default("fetch_retries", DEFAULT_FETCH_RETRIES as i64)?
            .set_default("fetch_concurrency", DEFAULT_FETCH_CONCURRENCY as i64)?
            .set_default(
                "user_agent",
                concat!("site_profiler/", env!("CARGO_PKG_VERSION")),
            )?
            .add_source(env)
            .build()
            .context("Failed to read settings from environment")?
            .try_deserialize::<Settings>()
            .context("Invalid settings")?;

        if settings.fetch_concurrency == 0 {
            anyhow::bail!("FETCH_CONCURRENCY must be at least 1");
        }
        Ok(settings)
    }

    pub fn extract_config(&self) -> ExtractConfig {
        ExtractConfig {
            max_content_size: self.max_content_size,
        }
    }
}
