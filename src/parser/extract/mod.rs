pub mod content;
pub mod head;
pub mod keywords;
pub mod structure;

use scraper::Html;

/// Everything the section extractors derive from one tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sections {
    pub title: String,
    pub meta_description: String,
    pub headings: Vec<String>,
    pub navigation: Vec<String>,
    pub about_text: String,
    pub products: Vec<String>,
    pub contact: String,
    pub main_content: String,
    pub has_logo: bool,
}

/// Run every extractor. They share nothing but the read-only tree, so order
/// is irrelevant.
pub fn extract_all(doc: &Html) -> Sections {
    Sections {
        title: head::title(doc),
        meta_description: head::meta_description(doc),
        headings: structure::headings(doc),
        navigation: structure::navigation(doc),
        about_text: keywords::about(doc),
        products: keywords::products(doc),
        contact: keywords::contact(doc),
        main_content: content::main_content(doc),
        has_logo: content::has_logo(doc),
    }
}
