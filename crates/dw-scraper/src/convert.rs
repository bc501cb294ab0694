//! Page conversion: rendered HTML in, Markdown out.
//!
//! The pipeline for one page:
//!
//! 1. flowcharts are swapped for markers and recovered ([`DiagramConverter::prepare`])
//! 2. the main content element is selected
//! 3. navigation elements inside it are removed
//! 4. HTML is translated to Markdown with `htmd`
//! 5. runs of blank lines are collapsed
//! 6. link targets are dropped (`[text](url)` becomes `[text]()`)
//! 7. markers are replaced by the rendered diagrams

use std::sync::LazyLock;

use dw_diagrams::{ConversionStats, DiagramConverter, PreparedDocument};
use htmd::HtmlToMarkdown;
use htmd::options::{HeadingStyle, Options};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::dom::{has_text, selectors, text_of};
use crate::navigation::SITE_SIDEBAR;

/// Main-content candidates, most specific first.
static CONTENT: LazyLock<Vec<(String, Selector)>> = LazyLock::new(|| {
    selectors(&[
        "main article",
        "main .content",
        "main",
        "article",
        ".content",
        ".article-content",
        "#content",
        ".markdown-body",
        ".documentation-content",
        ".page-content",
        r#"[role="main"]"#,
    ])
});

/// Elements removed from the content before translation.
static NAVIGATION: LazyLock<Vec<(String, Selector)>> =
    LazyLock::new(|| selectors(&[SITE_SIDEBAR, "nav", ".navigation", ".sidebar", ".menu"]));

static TITLE: LazyLock<Vec<(String, Selector)>> =
    LazyLock::new(|| selectors(&["h1", "title", ".page-title", ".article-title"]));

static BODY: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static DIV: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div").unwrap());

static LINK_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());

/// A converted page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedPage {
    /// Page title, if the page has one.
    pub title: Option<String>,
    /// Final Markdown.
    pub content: String,
    pub stats: ConversionStats,
    /// Non-fatal problems (e.g. diagram markers lost in translation).
    pub warnings: Vec<String>,
}

/// Converts rendered pages to Markdown.
pub struct PageConverter {
    diagrams: Option<DiagramConverter>,
    markdown: HtmlToMarkdown,
}

impl Default for PageConverter {
    fn default() -> Self {
        Self::new()
    }
}

impl PageConverter {
    /// Converter that leaves flowcharts alone.
    #[must_use]
    pub fn new() -> Self {
        let markdown = HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style"])
            .options(Options {
                heading_style: HeadingStyle::Atx,
                ..Default::default()
            })
            .build();
        Self {
            diagrams: None,
            markdown,
        }
    }

    /// Replace flowcharts with textual diagrams using `converter`.
    #[must_use]
    pub fn with_diagrams(mut self, converter: DiagramConverter) -> Self {
        self.diagrams = Some(converter);
        self
    }

    /// Convert one page.
    ///
    /// Returns `None` when the page has no textual content or translation
    /// fails.
    pub fn convert_page(&self, html: &str) -> Option<ConvertedPage> {
        let prepared = match &self.diagrams {
            Some(converter) => converter.prepare(html),
            None => PreparedDocument {
                markup: html.to_owned(),
                ..PreparedDocument::default()
            },
        };

        let document = Html::parse_document(&prepared.markup);
        let title = extract_title(&document);
        let Some(main) = select_main_content(&document) else {
            tracing::warn!("no main content found");
            return None;
        };

        let content_html = strip_navigation(&main.html());
        let markdown = match self.markdown.convert(&content_html) {
            Ok(markdown) => markdown,
            Err(e) => {
                tracing::error!(error = %e, "HTML to Markdown translation failed");
                return None;
            }
        };

        let markdown = collapse_blank_lines(&markdown);
        if markdown.is_empty() {
            tracing::warn!("page translated to empty Markdown");
            return None;
        }
        let markdown = strip_link_targets(&markdown);
        let outcome = prepared.splice(&markdown);

        Some(ConvertedPage {
            title,
            content: outcome.text,
            stats: prepared.stats,
            warnings: outcome.warnings,
        })
    }
}

/// First non-empty text among the title candidates.
fn extract_title(document: &Html) -> Option<String> {
    TITLE.iter().find_map(|(_, selector)| {
        let title = text_of(document.select(selector).next()?);
        (!title.is_empty()).then_some(title)
    })
}

fn select_main_content(document: &Html) -> Option<ElementRef<'_>> {
    for (source, selector) in CONTENT.iter() {
        if let Some(element) = document.select(selector).next()
            && has_text(element)
        {
            tracing::debug!(selector = %source, "found main content");
            return Some(element);
        }
    }

    let body = document.select(&BODY).next()?;
    let mut best: Option<(ElementRef<'_>, usize)> = None;
    for div in body.select(&DIV) {
        let len = text_len(div);
        if best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((div, len));
        }
    }

    let fallback = best.map_or(body, |(div, _)| div);
    has_text(fallback).then_some(fallback)
}

fn text_len(element: ElementRef<'_>) -> usize {
    element.text().map(|piece| piece.trim().chars().count()).sum()
}

/// Remove navigation elements from an HTML fragment.
fn strip_navigation(html: &str) -> String {
    let mut fragment = Html::parse_fragment(html);
    let ids: Vec<_> = NAVIGATION
        .iter()
        .flat_map(|(_, selector)| fragment.select(selector).map(|element| element.id()))
        .collect();

    for id in ids {
        if let Some(mut node) = fragment.tree.get_mut(id) {
            node.detach();
        }
    }
    fragment.root_element().inner_html()
}

/// Trim trailing whitespace and keep at most one empty line in a row.
fn collapse_blank_lines(markdown: &str) -> String {
    let mut lines = Vec::new();
    let mut previous_empty = false;

    for line in markdown.lines() {
        let line = line.trim_end();
        let empty = line.is_empty();
        if empty && previous_empty {
            continue;
        }
        lines.push(line);
        previous_empty = empty;
    }

    lines.join("\n").trim().to_owned()
}

/// `[text](target)` becomes `[text]()`.
fn strip_link_targets(markdown: &str) -> String {
    LINK_TARGET.replace_all(markdown, "[$1]()").into_owned()
}
