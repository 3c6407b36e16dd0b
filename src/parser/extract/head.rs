use std::sync::LazyLock;

use scraper::{Html, Selector};

static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("title").unwrap());
static META: LazyLock<Selector> = LazyLock::new(|| Selector::parse("meta").unwrap());

/// Text of the first `<title>`.
pub fn title(doc: &Html) -> String {
    doc.select(&TITLE)
        .next()
        .map(|t| t.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// `name="description"` content, else `property="og:description"` content.
pub fn meta_description(doc: &Html) -> String {
    meta_content(doc, "name", "description")
        .or_else(|| meta_content(doc, "property", "og:description"))
        .unwrap_or_default()
}

/// Trimmed, non-empty `content` of the first `<meta>` whose `attr` equals
/// `value` (ASCII case-insensitive).
fn meta_content(doc: &Html, attr: &str, value: &str) -> Option<String> {
    doc.select(&META)
        .filter(|m| {
            m.value()
                .attr(attr)
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(value))
        })
        .find_map(|m| {
            let content = m.value().attr("content")?.trim();
            (!content.is_empty()).then(|| content.to_string())
        })
}
