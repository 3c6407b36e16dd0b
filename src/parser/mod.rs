pub mod dom;
pub mod extract;

use chrono::{DateTime, Utc};
use scraper::Html;
use tracing::debug;

use crate::config::ExtractConfig;
use crate::governor::{govern, Truncation};
use crate::metrics;
use crate::profile::{DocumentMetrics, ExtractedProfile, RawDocument};

/// A profile plus what the governor had to cut to produce it.
#[derive(Debug, Clone)]
pub struct Extraction {
    pub profile: ExtractedProfile,
    pub truncation: Truncation,
}

/// Single pass: parse → extract sections → metrics → govern → assemble.
pub fn process_document(doc: &RawDocument, config: &ExtractConfig) -> Extraction {
    process_document_at(doc, config, Utc::now())
}

/// Same as [`process_document`] with a caller-supplied capture time, so
/// identical input gives an identical profile.
pub fn process_document_at(
    doc: &RawDocument,
    config: &ExtractConfig,
    scraped_at: DateTime<Utc>,
) -> Extraction {
    let tree = Html::parse_document(&doc.html);
    let sections = extract::extract_all(&tree);

    let full_text = dom::plain_text(&tree);
    // counted before the governor cuts the text
    let word_count = metrics::word_count(&full_text);
    let (raw_html, plain_text, truncation) = govern(&doc.url, &doc.html, &full_text, config);

    let metrics = DocumentMetrics {
        raw_html,
        plain_text,
        word_count,
        domain: metrics::domain(&doc.url),
    };
    let profile = ExtractedProfile::assemble(sections, metrics, scraped_at);

    debug!(
        url = %doc.url,
        words = profile.word_count,
        headings = profile.headings.len(),
        nav = profile.navigation.len(),
        products = profile.products.len(),
        score = profile.quality_score,
        "Extracted profile"
    );

    Extraction {
        profile,
        truncation,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::governor::*;

    fn fixture(name: &str) -> RawDocument {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", name)).unwrap();
        RawDocument::new("https://www.acme-widgets.com/home", html)
    }

    fn words(n: usize) -> String {
        vec!["word"; n].join(" ")
    }

    #[test]
    fn acme_profile() {
        let out = process_document(&fixture("acme"), &ExtractConfig::default());
        let p = out.profile;
        assert_eq!(p.title, "Acme Widgets | Industrial widgets since 1952");
        assert_eq!(p.meta_description, "Acme builds precision widgets for factories worldwide.");
        assert_eq!(p.headings, vec!["Acme Widgets", "About Acme", "Our Products", "Get in touch"]);
        assert_eq!(p.navigation, vec!["Home", "Widgets", "Team", "Blog"]);
        assert!(p.about_text.starts_with("About Acme"));
        assert!(p.about_text.contains("family-owned"));
        assert_eq!(
            p.products,
            vec![
                "Our Products",
                "Precision product line",
                "Custom widget service",
                "Field repair service"
            ]
        );
        assert_eq!(p.contact, "Email hello@acme-widgets.com Phone +1 937 555 0100");
        assert!(p.main_content.starts_with("Acme has been building"));
        assert!(p.has_logo);
        assert_eq!(p.domain, "www.acme-widgets.com");
        assert_eq!(p.language, "en");
        assert!(p.word_count > 100);
        assert!(!out.truncation.any());
        assert!(!p.plain_text.contains("analytics"));
    }

    #[test]
    fn identical_input_identical_profile() {
        let doc = fixture("acme");
        let cfg = ExtractConfig::default();
        let at = Utc::now();
        let a = process_document_at(&doc, &cfg, at).profile;
        let b = process_document_at(&doc, &cfg, at).profile;
        assert_eq!(a, b);
    }

    #[test]
    fn empty_document() {
        let p = process_document(&RawDocument::new("https://example.com", ""), &ExtractConfig::default()).profile;
        assert_eq!(p.raw_html, "");
        assert_eq!(p.plain_text, "");
        assert_eq!(p.title, "");
        assert_eq!(p.meta_description, "");
        assert_eq!(p.about_text, "");
        assert_eq!(p.contact, "");
        assert_eq!(p.main_content, "");
        assert!(p.headings.is_empty());
        assert!(p.navigation.is_empty());
        assert!(p.products.is_empty());
        assert_eq!(p.word_count, 0);
        assert_eq!(p.quality_score, 0.0);
        assert!(!p.has_logo);
        assert_eq!(p.domain, "example.com");
    }

    #[test]
    fn scored_scenario() {
        // title + description + 3 headings + body, 250 words overall
        let html = format!(
            r#"<html><head><title>Acme</title><meta name="description" content="Widgets"></head>
            <body><h1>One</h1><h2>Two</h2><h3>Three</h3><p>{}</p></body></html>"#,
            words(246)
        );
        let p = process_document(&RawDocument::new("https://acme.io", html), &ExtractConfig::default()).profile;
        assert_eq!(p.word_count, 250);
        assert_eq!(p.quality_score, 0.85);
    }

    #[test]
    fn word_threshold_steps() {
        let cfg = ExtractConfig::default();
        let score = |n: usize| {
            let html = format!("<p>{}</p>", words(n));
            process_document(&RawDocument::new("u", html), &cfg).profile.quality_score
        };
        assert_eq!(score(199), 0.0);
        assert_eq!(score(200), 0.7);
        assert_eq!(score(499), 0.7);
        assert_eq!(score(500), 0.8);
    }

    #[test]
    fn oversized_content_truncated_but_counted() {
        let html = format!("<html><body><p>{}</p></body></html>", words(1000));
        let cfg = ExtractConfig {
            max_content_size: 100,
        };
        let out = process_document(&RawDocument::new("https://acme.io", html.clone()), &cfg);
        assert!(out.truncation.raw_html);
        assert!(out.truncation.plain_text);
        assert_eq!(out.profile.raw_html, &html[..100]);
        assert!(out.profile.plain_text.len() <= 100);
        assert_eq!(out.profile.word_count, 1000);
        assert_eq!(out.profile.quality_score, 0.8);
    }

    #[test]
    fn bounds_hold_on_noisy_page() {
        let mut body = String::new();
        for i in 0..40 {
            body.push_str(&format!("<h2>About section {}</h2>", i));
            body.push_str(&format!("<nav><a href=\"/{0}\">Link {0}</a></nav>", i));
            body.push_str(&format!("<div><p>Our product and service number {} {}</p></div>", i, words(60)));
            body.push_str(&format!("<li>Contact line {}</li>", i));
        }
        let html = format!("<html><body>{}</body></html>", body);
        let p = process_document(&RawDocument::new("https://acme.io", html), &ExtractConfig::default()).profile;
        assert!(p.headings.len() <= MAX_HEADINGS);
        assert!(p.navigation.len() <= MAX_NAV_LINKS);
        assert!(p.products.len() <= MAX_PRODUCTS);
        assert!(p.about_text.chars().count() <= MAX_ABOUT_CHARS);
        assert!(p.contact.chars().count() <= MAX_CONTACT_CHARS);
        assert!(p.main_content.chars().count() <= MAX_MAIN_CONTENT_CHARS);
        assert!((0.0..=1.0).contains(&p.quality_score));
        assert_eq!(p.headings.len(), 20);
        assert_eq!(p.navigation.len(), 30);
    }
}
