//! Keyword-driven section lookup.
//!
//! Text nodes under `<body>` are scanned in document order for a
//! case-insensitive substring match; each hit resolves to its nearest block
//! ancestor and that block's text becomes the candidate value.

use scraper::Html;

use crate::governor::{
    truncate_chars, MAX_ABOUT_CHARS, MAX_CONTACT_CHARS, MAX_PRODUCTS, PRODUCTS_PER_KEYWORD,
    PRODUCT_TEXT_LIMIT,
};
use crate::parser::dom::{block_ancestor, content_root, element_text, text_nodes, TextNode};

pub const ABOUT_KEYWORDS: &[&str] = &["about", "company", "who we are", "our story"];
pub const PRODUCT_KEYWORDS: &[&str] = &["product", "service", "solution", "offering"];
pub const CONTACT_KEYWORDS: &[&str] = &["contact", "phone", "email", "address"];

pub fn about(doc: &Html) -> String {
    first_block(doc, ABOUT_KEYWORDS, MAX_ABOUT_CHARS)
}

pub fn contact(doc: &Html) -> String {
    first_block(doc, CONTACT_KEYWORDS, MAX_CONTACT_CHARS)
}

/// Up to [`PRODUCTS_PER_KEYWORD`] short blocks per keyword, keywords visited
/// in list order, [`MAX_PRODUCTS`] overall.
pub fn products(doc: &Html) -> Vec<String> {
    let mut out = Vec::new();
    for keyword in PRODUCT_KEYWORDS {
        for node in matching(doc, keyword).take(PRODUCTS_PER_KEYWORD) {
            if out.len() >= MAX_PRODUCTS {
                return out;
            }
            let text = element_text(block_ancestor(&node));
            if !text.is_empty() && text.chars().count() < PRODUCT_TEXT_LIMIT {
                out.push(text);
            }
        }
    }
    out
}

/// Block text of the first hit for the first keyword that has any hit.
fn first_block(doc: &Html, keywords: &[&str], cap: usize) -> String {
    keywords
        .iter()
        .find_map(|kw| matching(doc, kw).next())
        .map(|node| {
            let text = element_text(block_ancestor(&node));
            truncate_chars(&text, cap).trim_end().to_string()
        })
        .unwrap_or_default()
}

fn matching<'a>(doc: &'a Html, keyword: &'a str) -> impl Iterator<Item = TextNode<'a>> + 'a {
    text_nodes(content_root(doc)).filter(move |node| contains_ignore_case(node.text, keyword))
}

/// `needle` must already be lowercase.
fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn about_first_keyword_wins() {
        let doc = Html::parse_document(
            r#"<body>
                <div><p>Our company was founded in 1999.</p></div>
                <section><h2>About Us</h2><p>We make widgets.</p></section>
            </body>"#,
        );
        // "about" is tried before "company" even though "company" appears first
        assert_eq!(about(&doc), "About Us We make widgets.");
    }

    #[test]
    fn about_falls_through_keywords() {
        let doc = Html::parse_document("<body><p>Read OUR STORY here.</p></body>");
        assert_eq!(about(&doc), "Read OUR STORY here.");
    }

    #[test]
    fn about_capped() {
        let doc = Html::parse_document(&format!("<body><div>about {}</div></body>", "a".repeat(2000)));
        let text = about(&doc);
        assert_eq!(text.chars().count(), 1000);
        assert!(text.starts_with("about aaa"));
    }

    #[test]
    fn contact_takes_nearest_block() {
        let doc = Html::parse_document(
            r#"<body><footer><ul><li>Call our <b>Phone</b> line: 555-0100</li><li>Other</li></ul></footer></body>"#,
        );
        assert_eq!(contact(&doc), "Call our Phone line: 555-0100");
    }

    #[test]
    fn contact_capped() {
        let doc = Html::parse_document(&format!("<body><p>Email: {}</p></body>", "é".repeat(600)));
        assert_eq!(contact(&doc).chars().count(), 500);
    }

    #[test]
    fn nothing_matches() {
        let doc = Html::parse_document("<body><p>Nothing relevant.</p></body>");
        assert_eq!(about(&doc), "");
        assert_eq!(contact(&doc), "");
        assert!(products(&doc).is_empty());
    }

    #[test]
    fn head_text_is_not_scanned() {
        let doc = Html::parse_document("<head><title>About Acme</title></head><body><p>Hi</p></body>");
        assert_eq!(about(&doc), "");
    }

    #[test]
    fn products_limited_per_keyword() {
        let items: String = (0..8).map(|i| format!("<li>Product {}</li>", i)).collect();
        let doc = Html::parse_document(&format!("<body><ul>{}</ul></body>", items));
        let p = products(&doc);
        assert_eq!(p, vec!["Product 0", "Product 1", "Product 2", "Product 3", "Product 4"]);
    }

    #[test]
    fn products_skip_long_blocks() {
        let doc = Html::parse_document(&format!(
            "<body><p>Our product {}</p><li>Cloud service</li></body>",
            "x".repeat(200)
        ));
        assert_eq!(products(&doc), vec!["Cloud service"]);
    }

    #[test]
    fn products_across_keywords_in_list_order() {
        let doc = Html::parse_document(
            "<body><li>Consulting service</li><li>Flagship product</li><li>Turnkey solution</li></body>",
        );
        assert_eq!(
            products(&doc),
            vec!["Flagship product", "Consulting service", "Turnkey solution"]
        );
    }

    #[test]
    fn products_capped_at_twenty() {
        let mut items = String::new();
        for kw in PRODUCT_KEYWORDS {
            for i in 0..7 {
                items.push_str(&format!("<li>{} number {}</li>", kw, i));
            }
        }
        let doc = Html::parse_document(&format!("<body><ul>{}</ul></body>", items));
        let p = products(&doc);
        assert_eq!(p.len(), 20);
        assert_eq!(p[0], "product number 0");
        assert_eq!(p[19], "offering number 4");
    }
}
