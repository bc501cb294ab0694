//! Library-level scrape loop.

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use dw_diagrams::ConversionStats;

use crate::convert::{ConvertedPage, PageConverter};
use crate::fetch::{FetchError, Fetcher};
use crate::navigation::extract_navigation;
use crate::wiki_url::WikiUrl;
use crate::writer::PageWriter;

/// Default pause between page fetches.
const DEFAULT_PAGE_DELAY: Duration = Duration::from_secs(1);

/// Library-level failure. Page-level failures are logged and skipped instead.
#[derive(Debug, thiserror::Error)]
pub enum ScrapeError {
    #[error("invalid DeepWiki URL: {0}")]
    InvalidUrl(String),

    #[error("failed to fetch main page {url}: {source}")]
    MainPage {
        url: String,
        #[source]
        source: FetchError,
    },
}

/// One successfully converted page.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub url: String,
    pub title: String,
    pub content: String,
    /// Where the page was written, if it was.
    pub path: Option<PathBuf>,
    pub stats: ConversionStats,
    pub warnings: Vec<String>,
}

/// Outcome of scraping one library.
#[derive(Debug, Clone, Default)]
pub struct LibraryReport {
    pub library: String,
    /// Converted pages, in navigation order.
    pub pages: Vec<ScrapedPage>,
    /// Pages the scraper tried to fetch.
    pub attempted: usize,
    /// Pages written to disk.
    pub saved: usize,
}

impl LibraryReport {
    /// Diagram counters summed over all pages.
    #[must_use]
    pub fn diagram_stats(&self) -> ConversionStats {
        let mut total = ConversionStats::default();
        for page in &self.pages {
            total += page.stats;
        }
        total
    }
}

/// Scrapes whole libraries: landing page, navigation, then every page.
pub struct LibraryScraper {
    fetcher: Box<dyn Fetcher>,
    converter: PageConverter,
    writer: Option<PageWriter>,
    page_delay: Duration,
}

impl LibraryScraper {
    #[must_use]
    pub fn new(fetcher: Box<dyn Fetcher>, converter: PageConverter) -> Self {
        Self {
            fetcher,
            converter,
            writer: None,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Save converted pages with `writer`.
    #[must_use]
    pub fn writer(mut self, writer: PageWriter) -> Self {
        self.writer = Some(writer);
        self
    }

    #[must_use]
    pub fn page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Scrape every page of the library at `url`.
    ///
    /// Without navigation only the landing page is converted. Individual
    /// pages that fail to fetch, convert or save are skipped.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError`] if `url` is not a DeepWiki URL or its landing
    /// page cannot be fetched.
    pub fn scrape_library(&self, url: &str) -> Result<LibraryReport, ScrapeError> {
        let wiki_url = WikiUrl::parse(url);
        if !wiki_url.is_valid() {
            return Err(ScrapeError::InvalidUrl(url.to_owned()));
        }

        let library = wiki_url.library_name().unwrap_or("unknown_library").to_owned();
        tracing::info!(library = %library, "scraping library");

        let main_html = self
            .fetcher
            .fetch(wiki_url.as_str())
            .map_err(|source| ScrapeError::MainPage {
                url: wiki_url.as_str().to_owned(),
                source,
            })?;

        let mut report = LibraryReport {
            library,
            ..LibraryReport::default()
        };

        let nav_items = extract_navigation(&main_html, &wiki_url.base_url());
        if nav_items.is_empty() {
            tracing::warn!("no navigation items found, processing main page only");
            report.attempted = 1;
            let fallback_title = report.library.clone();
            self.process(&mut report, wiki_url.as_str(), &main_html, &fallback_title);
            return Ok(report);
        }

        let total = nav_items.len();
        for (index, item) in nav_items.iter().enumerate() {
            tracing::info!(page = index + 1, total, title = %item.title, "processing page");
            if index > 0 && !self.page_delay.is_zero() {
                thread::sleep(self.page_delay);
            }
            report.attempted += 1;

            match self.fetcher.fetch(&item.url) {
                Ok(html) => self.process(&mut report, &item.url, &html, &item.title),
                Err(e) => tracing::warn!(url = %item.url, error = %e, "failed to fetch page"),
            }
        }

        tracing::info!(
            library = %report.library,
            scraped = report.pages.len(),
            attempted = report.attempted,
            "library finished"
        );
        Ok(report)
    }

    /// Scrape several libraries in order. One library's failure does not
    /// stop the others.
    pub fn scrape_libraries<S: AsRef<str>>(
        &self,
        urls: &[S],
    ) -> Vec<Result<LibraryReport, ScrapeError>> {
        urls.iter()
            .map(|url| {
                let result = self.scrape_library(url.as_ref());
                if let Err(e) = &result {
                    tracing::error!(url = url.as_ref(), error = %e, "library failed");
                }
                result
            })
            .collect()
    }

    fn process(&self, report: &mut LibraryReport, url: &str, html: &str, fallback_title: &str) {
        let Some(ConvertedPage {
            title,
            content,
            stats,
            warnings,
        }) = self.converter.convert_page(html)
        else {
            tracing::warn!(url, "failed to convert page");
            return;
        };

        for warning in &warnings {
            tracing::warn!(url, warning = %warning, "page conversion warning");
        }

        let title = title.unwrap_or_else(|| fallback_title.to_owned());
        let path = self.writer.as_ref().and_then(|writer| {
            writer
                .save(&report.library, &title, &content)
                .inspect_err(|e| tracing::error!(url, error = %e, "failed to save page"))
                .ok()
        });
        if path.is_some() {
            report.saved += 1;
        }

        report.pages.push(ScrapedPage {
            url: url.to_owned(),
            title,
            content,
            path,
            stats,
            warnings,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockFetcher;
    use pretty_assertions::assert_eq;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    /// Lets a test keep a handle on the fetcher it gives away.
    struct SharedFetcher(Arc<MockFetcher>);

    impl Fetcher for SharedFetcher {
        fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0.fetch(url)
        }
    }

    const LIBRARY: &str = "https://deepwiki.com/owner/lib";

    fn landing(links: &[(&str, &str)]) -> String {
        let items: String = links
            .iter()
            .map(|(href, title)| format!(r#"<li><a href="{href}">{title}</a></li>"#))
            .collect();
        format!(
            r#"<html><body><ul class="flex-1 flex-shrink-0 space-y-1 overflow-y-auto py-1">{items}</ul><main><h1>Home</h1><p>Landing</p></main></body></html>"#
        )
    }

    fn page(title: &str, body: &str) -> String {
        format!("<html><body><main><h1>{title}</h1><p>{body}</p></main></body></html>")
    }

    fn scraper(fetcher: MockFetcher) -> LibraryScraper {
        LibraryScraper::new(Box::new(fetcher), PageConverter::new()).page_delay(Duration::ZERO)
    }

    #[test]
    fn test_invalid_url() {
        let err = scraper(MockFetcher::new())
            .scrape_library("https://example.com/owner/lib")
            .unwrap_err();

        assert!(matches!(err, ScrapeError::InvalidUrl(_)));
    }

    #[test]
    fn test_unreachable_main_page() {
        let err = scraper(MockFetcher::new()).scrape_library(LIBRARY).unwrap_err();

        assert!(matches!(err, ScrapeError::MainPage { .. }));
    }

    #[test]
    fn test_scrapes_navigation_in_order_and_skips_failures() {
        let fetcher = MockFetcher::new()
            .with_page(LIBRARY, landing(&[
                ("/owner/lib/1-overview", "Overview"),
                ("/owner/lib/2-missing", "Missing"),
                ("/owner/lib/3-empty", "Empty"),
                ("/owner/lib/4-design", "Design"),
            ]))
            .with_page("https://deepwiki.com/owner/lib/1-overview", page("Overview", "First"))
            .with_page("https://deepwiki.com/owner/lib/3-empty", "<html><body></body></html>")
            .with_page("https://deepwiki.com/owner/lib/4-design", page("Design", "Fourth"));
        let dir = TempDir::new().unwrap();
        let scraper = scraper(fetcher).writer(PageWriter::new(dir.path()));

        let report = scraper.scrape_library(&format!("{LIBRARY}/")).unwrap();

        assert_eq!(report.library, "lib");
        assert_eq!(report.attempted, 4);
        assert_eq!(report.saved, 2);
        let titles: Vec<_> = report.pages.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Overview", "Design"]);
        assert_eq!(
            fs::read_to_string(dir.path().join("lib/Design.md")).unwrap(),
            "# Design\n\nFourth"
        );
    }

    #[test]
    fn test_fetch_order() {
        let fetcher = MockFetcher::new().with_page(
            LIBRARY,
            landing(&[("/owner/lib/a", "A"), ("/owner/lib/b", "B")]),
        );
        let fetcher = Arc::new(fetcher);

        let scraper = LibraryScraper::new(
            Box::new(SharedFetcher(Arc::clone(&fetcher))),
            PageConverter::new(),
        )
        .page_delay(Duration::ZERO);
        let report = scraper.scrape_library(LIBRARY).unwrap();

        assert!(report.pages.is_empty());
        assert_eq!(
            fetcher.requests(),
            vec![
                LIBRARY.to_owned(),
                "https://deepwiki.com/owner/lib/a".to_owned(),
                "https://deepwiki.com/owner/lib/b".to_owned(),
            ]
        );
    }

    #[test]
    fn test_main_page_only_without_navigation() {
        let fetcher =
            MockFetcher::new().with_page(LIBRARY, "<html><body><main><p>Only page</p></main></body></html>");

        let report = scraper(fetcher).scrape_library(LIBRARY).unwrap();

        assert_eq!(report.attempted, 1);
        assert_eq!(report.saved, 0);
        assert_eq!(report.pages.len(), 1);
        assert_eq!(report.pages[0].title, "lib");
        assert_eq!(report.pages[0].content, "Only page");
        assert_eq!(report.pages[0].path, None);
    }

    #[test]
    fn test_nav_title_used_when_page_has_none() {
        let fetcher = MockFetcher::new()
            .with_page(LIBRARY, landing(&[("/owner/lib/x", "Nav Title")]))
            .with_page(
                "https://deepwiki.com/owner/lib/x",
                "<html><body><main><p>No heading</p></main></body></html>",
            );

        let report = scraper(fetcher).scrape_library(LIBRARY).unwrap();

        assert_eq!(report.pages[0].title, "Nav Title");
    }

    #[test]
    fn test_scrape_libraries_continues_after_failure() {
        let other = "https://deepwiki.com/owner/other";
        let fetcher = MockFetcher::new().with_page(other, page("Other", "Text"));

        let results = scraper(fetcher).scrape_libraries(&[
            "not a url",
            LIBRARY,
            other,
        ]);

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Err(ScrapeError::InvalidUrl(_))));
        assert!(matches!(results[1], Err(ScrapeError::MainPage { .. })));
        let report = results[2].as_ref().unwrap();
        assert_eq!(report.library, "other");
        assert_eq!(report.pages.len(), 1);
    }

    #[test]
    fn test_diagram_stats_sum_pages() {
        let mut report = LibraryReport::default();
        for converted in [1, 2] {
            report.pages.push(ScrapedPage {
                url: String::new(),
                title: String::new(),
                content: String::new(),
                path: None,
                stats: ConversionStats {
                    found: converted,
                    converted,
                    failed: 0,
                },
                warnings: Vec::new(),
            });
        }

        assert_eq!(report.diagram_stats().converted, 3);
    }
}
