use std::collections::{HashSet, VecDeque};

use anyhow::{Context, Result};
use quick_xml::events::Event;
use regex::Regex;
use tracing::{info, warn};

use crate::fetch::Fetcher;

/// Sitemap documents fetched per crawl, index files included.
const MAX_SITEMAPS: usize = 50;

/// Entries of one sitemap document. A `<urlset>` fills `pages`, a
/// `<sitemapindex>` fills `sitemaps`.
#[derive(Debug, Default, PartialEq)]
pub struct Sitemap {
    pub pages: Vec<String>,
    pub sitemaps: Vec<String>,
}

/// Page URLs reachable from `sitemap_url`, following index files
/// breadth-first. Pages keep document order, duplicates are dropped, and
/// `pattern` (if any) filters the result.
pub async fn fetch_urls(
    fetcher: &Fetcher,
    sitemap_url: &str,
    pattern: Option<&Regex>,
) -> Result<Vec<String>> {
    let mut queue = VecDeque::from([sitemap_url.to_string()]);
    let mut visited = HashSet::new();
    let mut seen_pages = HashSet::new();
    let mut pages = Vec::new();

    while let Some(url) = queue.pop_front() {
        if !visited.insert(url.clone()) {
            continue;
        }
        if visited.len() > MAX_SITEMAPS {
            warn!("Sitemap limit of {} reached, skipping {} and the rest", MAX_SITEMAPS, url);
            break;
        }

        info!("Fetching sitemap: {}", url);
        let xml = fetcher
            .fetch_text(&url)
            .await
            .with_context(|| format!("Failed to fetch sitemap {}", url))?;
        let sitemap = parse_sitemap(&xml).with_context(|| format!("Failed to parse sitemap {}", url))?;
        info!(
            "{}: {} pages, {} nested sitemaps",
            url,
            sitemap.pages.len(),
            sitemap.sitemaps.len()
        );

        pages.extend(sitemap.pages.into_iter().filter(|p| seen_pages.insert(p.clone())));
        queue.extend(sitemap.sitemaps);
    }
    info!("Total URLs in sitemaps: {}", pages.len());

    if let Some(re) = pattern {
        pages.retain(|u| re.is_match(u));
        info!("URLs after filtering: {}", pages.len());
    }
    Ok(pages)
}

/// Parse a `<urlset>` or `<sitemapindex>` document. A `<loc>` counts only
/// directly under `<url>` or `<sitemap>`; anything else (image or video
/// extensions, stray locs) is skipped.
pub fn parse_sitemap(xml: &str) -> Result<Sitemap> {
    let mut reader = quick_xml::Reader::from_str(xml);
    let mut sitemap = Sitemap::default();
    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut loc = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                path.push(e.local_name().as_ref().to_vec());
                loc.clear();
            }
            Event::Text(e) if in_entry_loc(&path) => loc.push_str(&e.unescape()?),
            Event::CData(e) if in_entry_loc(&path) => {
                loc.push_str(&String::from_utf8_lossy(&e.into_inner()))
            }
            Event::End(_) => {
                if in_entry_loc(&path) && !loc.trim().is_empty() {
                    let entry = loc.trim().to_string();
                    match path[path.len() - 2].as_slice() {
                        b"sitemap" => sitemap.sitemaps.push(entry),
                        _ => sitemap.pages.push(entry),
                    }
                }
                path.pop();
                loc.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(sitemap)
}

fn in_entry_loc(path: &[Vec<u8>]) -> bool {
    match path {
        [.., parent, leaf] => {
            leaf.as_slice() == b"loc" && matches!(parent.as_slice(), b"url" | b"sitemap")
        }
        _ => false,
    }
}
