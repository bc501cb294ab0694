//! Navigation discovery on a library's landing page.

use std::collections::HashSet;
use std::sync::LazyLock;

use scraper::{Html, Selector};
use url::Url;

use crate::dom::{selectors, text_of};

/// Sidebar list used by DeepWiki pages.
pub(crate) const SITE_SIDEBAR: &str = "ul.flex-1.flex-shrink-0.space-y-1.overflow-y-auto.py-1";

/// Candidate navigation lists, most specific first. Only the first match is used.
static NAV_LISTS: LazyLock<Vec<(String, Selector)>> = LazyLock::new(|| {
    selectors(&[
        SITE_SIDEBAR,
        "nav ul",
        ".navigation ul",
        ".sidebar ul",
        ".menu ul",
        r#"ul[class*="nav"]"#,
        r#"ul[class*="menu"]"#,
    ])
});

static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| Selector::parse("li").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());

/// One page of a library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    pub title: String,
    /// Absolute URL.
    pub url: String,
}

/// Collect the page links of the first navigation list found in `html`.
///
/// Each list item contributes its first link with non-empty text. Relative
/// links are resolved against `base_url`; links that cannot be resolved and
/// repeated URLs are skipped.
#[must_use]
pub fn extract_navigation(html: &str, base_url: &str) -> Vec<NavItem> {
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    let Some((source, list)) = NAV_LISTS
        .iter()
        .find_map(|(source, selector)| document.select(selector).next().map(|list| (source, list)))
    else {
        tracing::info!("no navigation list found");
        return Vec::new();
    };
    tracing::debug!(selector = %source, "found navigation list");

    let mut seen = HashSet::new();
    let mut items = Vec::new();

    for item in list.select(&LIST_ITEM) {
        let Some(link) = item.select(&LINK).next() else {
            continue;
        };
        let title = text_of(link);
        let href = link.value().attr("href").unwrap_or_default().trim();
        if title.is_empty() || href.is_empty() {
            continue;
        }
        let Some(url) = resolve(base.as_ref(), href) else {
            tracing::debug!(href, "skipping unresolvable navigation link");
            continue;
        };
        if seen.insert(url.clone()) {
            items.push(NavItem { title, url });
        }
    }

    tracing::info!(count = items.len(), "found navigation items");
    items
}

fn resolve(base: Option<&Url>, href: &str) -> Option<String> {
    let url = match base {
        Some(base) => base.join(href).ok()?,
        None => Url::parse(href).ok()?,
    };
    Some(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const BASE: &str = "https://deepwiki.com";

    fn item(title: &str, url: &str) -> NavItem {
        NavItem {
            title: title.to_owned(),
            url: url.to_owned(),
        }
    }

    #[test]
    fn test_site_sidebar() {
        let html = r#"<html><body>
            <ul class="flex-1 flex-shrink-0 space-y-1 overflow-y-auto py-1">
              <li><a href="/owner/lib/1-overview">Overview</a></li>
              <li><a href="/owner/lib/2-architecture"> Architecture <span>&amp; Design</span></a></li>
            </ul>
            <nav><ul><li><a href="/elsewhere">Ignored</a></li></ul></nav>
        </body></html>"#;

        let items = extract_navigation(html, BASE);

        assert_eq!(
            items,
            vec![
                item("Overview", "https://deepwiki.com/owner/lib/1-overview"),
                item("Architecture & Design", "https://deepwiki.com/owner/lib/2-architecture"),
            ]
        );
    }

    #[test]
    fn test_falls_back_to_nav_list() {
        let html = r#"<nav><ul>
            <li><a href="https://other.example/page">Absolute</a></li>
            <li><a href="">Empty href</a></li>
            <li><a href="/x"> </a></li>
            <li>No link</li>
            <li><a href="relative">Relative</a></li>
        </ul></nav>"#;

        let items = extract_navigation(html, BASE);

        assert_eq!(
            items,
            vec![
                item("Absolute", "https://other.example/page"),
                item("Relative", "https://deepwiki.com/relative"),
            ]
        );
    }

    #[test]
    fn test_class_substring_selector() {
        let html = r#"<ul class="main-menu"><li><a href="/a">A</a></li></ul>"#;

        assert_eq!(extract_navigation(html, BASE), vec![item("A", "https://deepwiki.com/a")]);
    }

    #[test]
    fn test_duplicate_urls_kept_once() {
        let html = r#"<nav><ul>
            <li><a href="/a">A</a><ul><li><a href="/b">B</a></li></ul></li>
        </ul></nav>"#;

        let items = extract_navigation(html, BASE);

        assert_eq!(
            items,
            vec![item("A", "https://deepwiki.com/a"), item("B", "https://deepwiki.com/b")]
        );
    }

    #[test]
    fn test_no_navigation() {
        assert!(extract_navigation("<main><p>Just content</p></main>", BASE).is_empty());
    }

    #[test]
    fn test_relative_links_need_base() {
        let html = r#"<nav><ul><li><a href="/a">A</a></li></ul></nav>"#;

        assert!(extract_navigation(html, "").is_empty());
    }
}
