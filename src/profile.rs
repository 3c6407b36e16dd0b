use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ExtractError;
use crate::parser::extract::Sections;
use crate::score::{quality_score, ScoreInputs};

/// No language detection is performed.
pub const LANGUAGE: &str = "en";

/// Share of NUL and U+FFFD characters above which decoded bytes are not
/// considered text.
const MAX_SUSPECT_RATIO: f64 = 0.10;

/// A fetched page as handed to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawDocument {
    pub url: String,
    pub html: String,
}

impl RawDocument {
    pub fn new(url: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            html: html.into(),
        }
    }

    /// Decode a response body. Invalid UTF-8 sequences are replaced and a
    /// stray NUL is left to the HTML parser; only input where NULs and
    /// replacement characters make up more than a tenth of the text is
    /// rejected as binary.
    pub fn from_bytes(url: impl Into<String>, bytes: &[u8]) -> Result<Self, ExtractError> {
        let html = String::from_utf8_lossy(bytes);
        let total = html.chars().count();
        let suspect = html
            .chars()
            .filter(|&c| c == '\0' || c == char::REPLACEMENT_CHARACTER)
            .count();
        if total > 0 && suspect as f64 / total as f64 > MAX_SUSPECT_RATIO {
            return Err(ExtractError::NotText { suspect, total });
        }

        Ok(Self::new(url, html.into_owned()))
    }
}

/// Normalized business profile of one page. Created once per request and
/// never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedProfile {
    pub raw_html: String,
    pub plain_text: String,
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<String>,
    pub navigation: Vec<String>,
    pub about_text: String,
    pub products: Vec<String>,
    pub contact: String,
    pub main_content: String,
    pub word_count: usize,
    pub language: String,
    pub has_logo: bool,
    pub quality_score: f64,
    pub domain: String,
    pub scraped_at: DateTime<Utc>,
}

/// Document-level values computed alongside the sections.
#[derive(Debug, Clone, Default)]
pub struct DocumentMetrics {
    pub raw_html: String,
    pub plain_text: String,
    pub word_count: usize,
    pub domain: String,
}

impl ExtractedProfile {
    pub fn assemble(sections: Sections, metrics: DocumentMetrics, scraped_at: DateTime<Utc>) -> Self {
        let mut profile = Self {
            raw_html: metrics.raw_html,
            plain_text: metrics.plain_text,
            title: sections.title,
            meta_description: sections.meta_description,
            headings: sections.headings,
            navigation: sections.navigation,
            about_text: sections.about_text,
            products: sections.products,
            contact: sections.contact,
            main_content: sections.main_content,
            word_count: metrics.word_count,
            language: LANGUAGE.to_string(),
            has_logo: sections.has_logo,
            quality_score: 0.0,
            domain: metrics.domain,
            scraped_at,
        };
        profile.quality_score = profile.rescore();
        profile
    }

    /// Quality score recomputed from the profile's own fields.
    pub fn rescore(&self) -> f64 {
        quality_score(&ScoreInputs {
            word_count: self.word_count,
            has_title: !self.title.is_empty(),
            has_meta_description: !self.meta_description.is_empty(),
            heading_count: self.headings.len(),
        })
    }
}
