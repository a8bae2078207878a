//! Utility functions and helpers.

pub mod date;
pub mod http;
pub mod retry;

use url::Url;

/// Resolve a potentially relative URL against a base URL.
pub fn resolve_url(base: &Url, href: &str) -> Result<String, url::ParseError> {
    base.join(href).map(|u| u.to_string())
}

/// Append a path segment to a base URL string, keeping a trailing slash.
///
/// A base without a trailing slash is treated as a directory, so
/// `https://h/a` + `b` yields `https://h/a/b/` rather than `https://h/b/`.
pub fn join_segment(base_url: &str, segment: &str) -> Result<String, url::ParseError> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    resolve_url(&base, &format!("{}/", segment.trim_matches('/')))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_url() {
        let base = Url::parse("https://example.com/path/").unwrap();
        assert_eq!(
            resolve_url(&base, "page.html").unwrap(),
            "https://example.com/path/page.html"
        );
        assert_eq!(
            resolve_url(&base, "/root.html").unwrap(),
            "https://example.com/root.html"
        );
    }

    #[test]
    fn test_join_segment() {
        assert_eq!(
            join_segment("https://news.sanook.com/lotto/check/", "16012568").unwrap(),
            "https://news.sanook.com/lotto/check/16012568/"
        );
        assert_eq!(
            join_segment("https://news.sanook.com/lotto/check", "16012568").unwrap(),
            "https://news.sanook.com/lotto/check/16012568/"
        );
    }

    #[test]
    fn test_join_segment_rejects_bad_base() {
        assert!(join_segment("nope", "01").is_err());
    }
}
