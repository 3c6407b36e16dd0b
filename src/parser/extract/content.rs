use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::governor::{
    truncate_chars, MAX_MAIN_CONTENT_CHARS, MAX_MAIN_PARAGRAPHS, MIN_PARAGRAPH_CHARS,
};
use crate::parser::dom::{collapse_whitespace, render};

static PARAGRAPHS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("p").unwrap());
static IMAGES: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[alt]").unwrap());

/// Substantial paragraphs among the first ten `<p>` elements, space-joined.
pub fn main_content(doc: &Html) -> String {
    let joined = doc
        .select(&PARAGRAPHS)
        .take(MAX_MAIN_PARAGRAPHS)
        .map(|p| render(p, ' '))
        // length as written, before whitespace is squeezed
        .filter(|raw| raw.trim().chars().count() > MIN_PARAGRAPH_CHARS)
        .map(|raw| collapse_whitespace(&raw))
        .collect::<Vec<_>>()
        .join(" ");
    truncate_chars(joined.trim(), MAX_MAIN_CONTENT_CHARS)
        .trim_end()
        .to_string()
}

pub fn has_logo(doc: &Html) -> bool {
    doc.select(&IMAGES).any(|img| {
        img.value()
            .attr("alt")
            .is_some_and(|alt| alt.to_lowercase().contains("logo"))
    })
}
