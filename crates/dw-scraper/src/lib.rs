//! DeepWiki scraping for deepwiki2md.
//!
//! Fetches the rendered pages of a wiki library, converts each to Markdown
//! (with flowcharts turned into textual diagrams by `dw-diagrams`) and writes
//! one file per page.
//!
//! # Overview
//!
//! - [`Fetcher`]: source of rendered markup ([`ChromeFetcher`], [`HttpFetcher`])
//! - [`extract_navigation`]: page list from a library's landing page
//! - [`PageConverter`]: HTML → Markdown for one page
//! - [`PageWriter`]: `{output}/{library}/{title}.md`
//! - [`LibraryScraper`]: the loop tying them together
//! - [`MockFetcher`] for testing (behind `mock` feature flag)

mod convert;
mod dom;
mod fetch;
mod library;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod navigation;
mod wiki_url;
mod writer;

pub use convert::{ConvertedPage, PageConverter};
pub use fetch::{ChromeFetcher, FetchError, Fetcher, HttpFetcher};
pub use library::{LibraryReport, LibraryScraper, ScrapeError, ScrapedPage};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockFetcher;
pub use navigation::{NavItem, extract_navigation};
pub use wiki_url::WikiUrl;
pub use writer::{PageWriter, sanitize_filename};
