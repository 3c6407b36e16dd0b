//! Size and length ceilings.
//!
//! The whole-document byte ceiling comes from [`ExtractConfig`]; the per-field
//! caps below are fixed and applied by the extractors as they collect values.

use serde::Serialize;
use tracing::warn;

use crate::config::ExtractConfig;

pub const MAX_HEADINGS: usize = 20;
pub const MAX_NAV_LINKS: usize = 30;
/// Navigation entries must be strictly shorter than this.
pub const NAV_TEXT_LIMIT: usize = 100;
pub const MAX_ABOUT_CHARS: usize = 1000;
pub const MAX_PRODUCTS: usize = 20;
pub const PRODUCTS_PER_KEYWORD: usize = 5;
/// Product entries must be strictly shorter than this.
pub const PRODUCT_TEXT_LIMIT: usize = 200;
pub const MAX_CONTACT_CHARS: usize = 500;
pub const MAX_MAIN_CONTENT_CHARS: usize = 2000;
pub const MAX_MAIN_PARAGRAPHS: usize = 10;
/// Paragraphs must be strictly longer than this to count as main content.
pub const MIN_PARAGRAPH_CHARS: usize = 50;

/// Which document-sized fields were cut to the byte ceiling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Truncation {
    pub raw_html: bool,
    pub plain_text: bool,
}

impl Truncation {
    pub fn any(&self) -> bool {
        self.raw_html || self.plain_text
    }
}

/// Apply the byte ceiling to the raw markup and its plain-text rendering.
/// Truncated markup is not repaired.
pub fn govern(
    url: &str,
    raw_html: &str,
    plain_text: &str,
    config: &ExtractConfig,
) -> (String, String, Truncation) {
    let (html, raw_cut) = truncate_bytes(raw_html, config.max_content_size);
    let (text, text_cut) = truncate_bytes(plain_text, config.max_content_size);
    let truncation = Truncation {
        raw_html: raw_cut,
        plain_text: text_cut,
    };

    if truncation.any() {
        warn!(
            url,
            limit = config.max_content_size,
            html_bytes = raw_html.len(),
            text_bytes = plain_text.len(),
            "Content exceeds size ceiling, truncated"
        );
    }

    (html.to_string(), text.to_string(), truncation)
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub fn truncate_bytes(s: &str, max: usize) -> (&str, bool) {
    if s.len() <= max {
        return (s, false);
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    (&s[..end], true)
}

/// First `max` chars of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
