//! Read-only helpers over a parsed `scraper::Html` tree.
//!
//! Traversal is depth-first pre-order, i.e. document order. Text under
//! non-rendered elements (`script`, `style`, `noscript`, `template`) is never
//! visible to any extractor.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

const HIDDEN_TAGS: &[&str] = &["script", "style", "noscript", "template"];

const BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "div",
    "dt",
    "footer",
    "form",
    "header",
    "li",
    "main",
    "nav",
    "p",
    "section",
    "td",
    "th",
];

/// Non-block elements whose boundaries still separate words.
const BREAK_TAGS: &[&str] = &[
    "body", "dl", "figcaption", "h1", "h2", "h3", "h4", "h5", "h6", "head", "html", "ol", "option",
    "table", "tbody", "thead", "title", "tr", "ul",
];

/// A visible text node together with the element that contains it.
#[derive(Debug, Clone, Copy)]
pub struct TextNode<'a> {
    pub text: &'a str,
    pub parent: ElementRef<'a>,
}

fn is_hidden(parent: &ElementRef<'_>) -> bool {
    HIDDEN_TAGS.contains(&parent.value().name())
}

/// Visible text nodes under `root`, in document order.
pub fn text_nodes<'a>(root: ElementRef<'a>) -> impl Iterator<Item = TextNode<'a>> + 'a {
    root.descendants().filter_map(|node| {
        let text = node.value().as_text()?;
        let parent = node.parent().and_then(ElementRef::wrap)?;
        if is_hidden(&parent) {
            return None;
        }
        Some(TextNode {
            text: &text.text,
            parent,
        })
    })
}

/// `<body>` if the parser produced one, else the root element.
pub fn content_root(doc: &Html) -> ElementRef<'_> {
    doc.select(&BODY)
        .next()
        .unwrap_or_else(|| doc.root_element())
}

/// Visible text under `root` as written. Text inside one block is
/// concatenated unchanged, so inline markup never splits a word; `sep` goes
/// between blocks and at `<br>`.
pub fn render(root: ElementRef<'_>, sep: char) -> String {
    let mut out = String::new();
    let mut current: Option<ElementRef<'_>> = None;
    let mut pending = false;

    for node in root.descendants() {
        if let Some(el) = ElementRef::wrap(node) {
            if el.value().name() == "br" {
                pending = true;
            }
            continue;
        }
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let Some(parent) = node.parent().and_then(ElementRef::wrap) else {
            continue;
        };
        if is_hidden(&parent) {
            continue;
        }

        let block = enclosing_break(parent, root);
        if current.is_some_and(|c| (*c).id() != (*block).id()) {
            pending = true;
        }
        if pending && !out.is_empty() {
            out.push(sep);
        }
        pending = false;
        current = Some(block);
        out.push_str(&text.text);
    }
    out
}

/// Nearest element at or above `el` whose boundary separates words,
/// stopping at `root`.
fn enclosing_break<'a>(mut el: ElementRef<'a>, root: ElementRef<'a>) -> ElementRef<'a> {
    loop {
        if (*el).id() == (*root).id() || is_block(&el) || BREAK_TAGS.contains(&el.value().name()) {
            return el;
        }
        match el.parent().and_then(ElementRef::wrap) {
            Some(parent) => el = parent,
            None => return el,
        }
    }
}

/// Visible text of an element, whitespace runs collapsed to one space.
pub fn element_text(el: ElementRef<'_>) -> String {
    collapse_whitespace(&render(el, ' '))
}

/// Plain-text rendering of the whole document: one line per block, each
/// trimmed, empty lines dropped.
pub fn plain_text(doc: &Html) -> String {
    render(doc.root_element(), '\n')
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Nearest block-level element containing the text node, or its direct
/// parent if it has no block ancestor.
pub fn block_ancestor<'a>(node: &TextNode<'a>) -> ElementRef<'a> {
    if is_block(&node.parent) {
        return node.parent;
    }
    node.parent
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(is_block)
        .unwrap_or(node.parent)
}

fn is_block(el: &ElementRef<'_>) -> bool {
    BLOCK_TAGS.contains(&el.value().name())
}

pub fn collapse_whitespace(s: &str) -> String {
    WHITESPACE_RE.replace_all(s, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn by_id<'a>(doc: &'a Html, id: &str) -> ElementRef<'a> {
        let sel = Selector::parse(&format!("#{}", id)).unwrap();
        doc.select(&sel).next().unwrap()
    }

    #[test]
    fn skips_hidden_text() {
        let doc = Html::parse_document(
            "<html><head><title>T</title><style>p{}</style></head>\
             <body><p>one</p><script>var x = 1;</script><p>two</p></body></html>",
        );
        assert_eq!(plain_text(&doc), "T\none\ntwo");
        let body: Vec<_> = text_nodes(content_root(&doc)).map(|t| t.text).collect();
        assert_eq!(body, vec!["one", "two"]);
    }

    #[test]
    fn element_text_collapses_whitespace() {
        let doc = Html::parse_document("<div id=x>  Hello\n\n <b>big</b>   world </div>");
        assert_eq!(element_text(by_id(&doc, "x")), "Hello big world");
    }

    #[test]
    fn inline_markup_keeps_words_whole() {
        let doc = Html::parse_document(
            "<body><div id=x>Acme<sup>&reg;</sup> don<em>'</em>t <a href=/>stop</a></div></body>",
        );
        assert_eq!(element_text(by_id(&doc, "x")), "Acme\u{ae} don't stop");
        assert_eq!(plain_text(&doc), "Acme\u{ae} don't stop");
    }

    #[test]
    fn blocks_and_line_breaks_separate_text() {
        let doc = Html::parse_document(
            "<body><div id=x><p>one</p><p>two</p>three<br>four<ul><li>a</li><li>b</li></ul></div></body>",
        );
        assert_eq!(element_text(by_id(&doc, "x")), "one two three four a b");
        assert_eq!(plain_text(&doc), "one\ntwo\nthree\nfour\na\nb");
    }

    #[test]
    fn block_ancestor_skips_inline() {
        let doc = Html::parse_document(
            "<body><section><h2><span>About us</span></h2><p>We build.</p></section></body>",
        );
        let node = text_nodes(content_root(&doc))
            .find(|t| t.text.contains("About"))
            .unwrap();
        let block = block_ancestor(&node);
        assert_eq!(block.value().name(), "section");
        assert_eq!(element_text(block), "About us We build.");
    }

    #[test]
    fn block_ancestor_is_self_when_block() {
        let doc = Html::parse_document("<body><ul><li>Email us</li></ul></body>");
        let node = text_nodes(content_root(&doc)).next().unwrap();
        assert_eq!(block_ancestor(&node).value().name(), "li");
    }

    #[test]
    fn block_ancestor_falls_back_to_parent() {
        let doc = Html::parse_document("<body><span>contact</span></body>");
        let node = text_nodes(content_root(&doc)).next().unwrap();
        assert_eq!(block_ancestor(&node).value().name(), "span");
    }
}
