//! Mock fetcher for testing.
//!
//! Provides [`MockFetcher`] for exercising the scrape loop without a browser
//! or network.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::fetch::{FetchError, Fetcher};

/// Fetcher returning canned markup.
///
/// URLs without a canned page fail with [`FetchError::Status`] 404.
///
/// # Example
///
/// ```ignore
/// use dw_scraper::{Fetcher, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_page("https://deepwiki.com/o/lib", "<main>Home</main>");
///
/// assert!(fetcher.fetch("https://deepwiki.com/o/lib").is_ok());
/// assert_eq!(fetcher.requests(), vec!["https://deepwiki.com/o/lib"]);
/// ```
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: HashMap<String, String>,
    requests: RwLock<Vec<String>>,
}

impl MockFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for `url`.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.pages.insert(url.into(), html.into());
        self
    }

    /// Every URL fetched so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.requests.read().unwrap().clone()
    }
}

impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.requests.write().unwrap().push(url.to_owned());
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            status: 404,
            url: url.to_owned(),
        })
    }
}
