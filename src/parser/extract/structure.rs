use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::governor::{MAX_HEADINGS, MAX_NAV_LINKS, NAV_TEXT_LIMIT};
use crate::parser::dom::element_text;

static HEADINGS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, h2, h3").unwrap());
static NAV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("nav").unwrap());
static LINKS: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// Non-empty `h1`..`h3` texts in document order.
pub fn headings(doc: &Html) -> Vec<String> {
    doc.select(&HEADINGS)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .take(MAX_HEADINGS)
        .collect()
}

/// Link texts from every `<nav>`, in document order across all of them.
pub fn navigation(doc: &Html) -> Vec<String> {
    doc.select(&NAV)
        // links of a nested nav are already visited through its outer nav
        .filter(|nav| !inside_nav(nav))
        .flat_map(|nav| nav.select(&LINKS))
        .map(element_text)
        .filter(|t| !t.is_empty() && t.chars().count() < NAV_TEXT_LIMIT)
        .take(MAX_NAV_LINKS)
        .collect()
}

fn inside_nav(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| a.value().name() == "nav")
}
