//! Small helpers over `scraper` documents.

use scraper::{ElementRef, Selector};

/// Parse a list of compile-time selectors.
pub(crate) fn selectors(sources: &[&str]) -> Vec<(String, Selector)> {
    sources
        .iter()
        .map(|source| ((*source).to_owned(), Selector::parse(source).unwrap()))
        .collect()
}

/// Text content with each text node trimmed and empty ones dropped.
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Whether the element has any non-whitespace text.
pub(crate) fn has_text(element: ElementRef<'_>) -> bool {
    element.text().any(|piece| !piece.trim().is_empty())
}
