use serde::Deserialize;
use url::Url;

use super::types::TabId;

/// A top-level document request the extension intercepted.
#[derive(Debug, Clone, Deserialize)]
pub struct NavigationEvent {
    pub url: String,
    #[serde(rename = "tabId")]
    pub tab_id: TabId,
}

/// The browser also reports navigations to internal pages (about:, moz-extension:,
/// chrome: ...). Only web URLs are worth sending to the analysis server.
pub fn is_classifiable_url(raw: &str) -> bool {
    matches!(Url::parse(raw), Ok(url) if matches!(url.scheme(), "http" | "https"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_urls_are_classifiable() {
        assert!(is_classifiable_url("http://example.com"));
        assert!(is_classifiable_url("https://example.com/login?next=/home"));
    }

    #[test]
    fn internal_and_invalid_urls_are_skipped() {
        assert!(!is_classifiable_url("about:blank"));
        assert!(!is_classifiable_url("moz-extension://abc/options.html"));
        assert!(!is_classifiable_url("not a url"));
        assert!(!is_classifiable_url("ftp://example.com/file"));
    }
}
