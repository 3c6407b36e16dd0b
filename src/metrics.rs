use url::Url;

/// Whitespace-delimited token count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Network location of `url` exactly as written: host case, IDN spelling
/// and any explicit port are kept, userinfo is dropped. Parsing only decides
/// whether there is a host at all; without one the input comes back verbatim.
pub fn domain(url: &str) -> String {
    let has_host = Url::parse(url).is_ok_and(|parsed| parsed.host().is_some());
    match netloc(url) {
        Some(netloc) if has_host && !netloc.is_empty() => netloc.to_string(),
        _ => url.to_string(),
    }
}

fn netloc(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("://")?;
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    let authority = &rest[..end];
    Some(authority.rsplit_once('@').map_or(authority, |(_, host)| host))
}
