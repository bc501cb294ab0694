//! Flowchart extraction from rendered markup.
//!
//! Client-side rendered wiki pages embed their flowcharts as inline `<svg>`
//! elements whose opening tag carries `aria-roledescription="flowchart..."`.
//! [`extract`] cuts every such element out of the markup, leaving a
//! [`Marker`] paragraph in its place, and hands the raw SVG back to the caller.

use std::sync::LazyLock;

use regex::{Match, Regex};

use crate::marker::Marker;

/// Opening tag of a flowchart SVG.
static FLOWCHART_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<svg\b[^>]*?\saria-roledescription\s*=\s*["']\s*flowchart[^>]*>"#).unwrap()
});

/// Any opening, closing or self-closing `svg` tag.
static SVG_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<(/)?svg\b[^>]*>").unwrap());

/// Raw SVG markup of one flowchart, exactly as it appeared in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramFragment(String);

impl DiagramFragment {
    #[must_use]
    pub fn new(svg: impl Into<String>) -> Self {
        Self(svg.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Markup with flowcharts replaced by markers, plus the removed fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Input markup with each fragment replaced by `<p>{marker}</p>`.
    pub markup: String,
    /// Fragments in left-to-right discovery order; marker `i` is at index `i`.
    pub fragments: Vec<(Marker, DiagramFragment)>,
}

/// Replace every top-level flowchart SVG in `markup` with a marker paragraph.
///
/// A fragment runs from a matching opening tag to its balanced `</svg>`, so
/// nested `<svg>` elements and embedded newlines stay inside the fragment. An
/// opening tag without a closing tag is left untouched. Markup without
/// flowcharts is returned unchanged with no fragments.
#[must_use]
pub fn extract(markup: &str) -> Extraction {
    let mut output = String::with_capacity(markup.len());
    let mut fragments = Vec::new();
    let mut copied_to = 0;
    let mut search_from = 0;

    while let Some(open) = FLOWCHART_OPEN.find_at(markup, search_from) {
        let Some(end) = balanced_end(markup, &open) else {
            tracing::debug!(offset = open.start(), "unterminated flowchart svg left in place");
            search_from = open.end();
            continue;
        };

        let marker = Marker::new(fragments.len());
        output.push_str(&markup[copied_to..open.start()]);
        output.push_str("<p>");
        output.push_str(&marker.token());
        output.push_str("</p>");
        fragments.push((marker, DiagramFragment::new(&markup[open.start()..end])));

        copied_to = end;
        search_from = end;
    }

    if fragments.is_empty() {
        return Extraction {
            markup: markup.to_owned(),
            fragments,
        };
    }

    output.push_str(&markup[copied_to..]);
    tracing::debug!(count = fragments.len(), "extracted flowchart fragments");
    Extraction {
        markup: output,
        fragments,
    }
}

/// Byte offset just past the `</svg>` that closes `open`.
fn balanced_end(markup: &str, open: &Match<'_>) -> Option<usize> {
    if open.as_str().ends_with("/>") {
        return Some(open.end());
    }

    let rest = &markup[open.end()..];
    let mut depth = 1usize;
    for caps in SVG_TAG.captures_iter(rest) {
        let tag = caps.get(0)?;
        if caps.get(1).is_some() {
            depth -= 1;
            if depth == 0 {
                return Some(open.end() + tag.end());
            }
        } else if !tag.as_str().ends_with("/>") {
            depth += 1;
        }
    }
    None
}
