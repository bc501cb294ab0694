//! Marker tokens and the marker-to-diagram mapping.
//!
//! A [`Marker`] stands in for one extracted diagram while the document goes
//! through HTML→Markdown translation. Its token is plain text made of
//! characters no Markdown translator escapes, so it survives translation
//! verbatim: `{{DEEPWIKI-DIAGRAM-<n>}}`.

use std::fmt;

/// Substring present in every marker token and in nothing else we emit.
pub const MARKER_SENTINEL: &str = "DEEPWIKI-DIAGRAM-";

pub(crate) const MARKER_OPEN: &str = "{{DEEPWIKI-DIAGRAM-";
pub(crate) const MARKER_CLOSE: &str = "}}";

/// Placeholder for one diagram, numbered in discovery order from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Marker(usize);

impl Marker {
    #[must_use]
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }

    /// The text embedded in the document for this marker.
    #[must_use]
    pub fn token(self) -> String {
        self.to_string()
    }

    /// Parse a marker token at the start of `text`.
    ///
    /// Returns the marker and the byte length of the token.
    pub(crate) fn parse_prefix(text: &str) -> Option<(Self, usize)> {
        let rest = text.strip_prefix(MARKER_OPEN)?;
        let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
        if digits == 0 || !rest[digits..].starts_with(MARKER_CLOSE) {
            return None;
        }
        let index = rest[..digits].parse().ok()?;
        Some((Self(index), MARKER_OPEN.len() + digits + MARKER_CLOSE.len()))
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{MARKER_OPEN}{}{MARKER_CLOSE}", self.0)
    }
}

/// Final text for every marker of one document, in discovery order.
///
/// Filled once before splicing and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecoveryMapping {
    entries: Vec<(Marker, String)>,
}

impl RecoveryMapping {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the text for `marker`, replacing an earlier entry for the same marker.
    pub fn insert(&mut self, marker: Marker, text: String) {
        if let Some(entry) = self.entries.iter_mut().find(|(m, _)| *m == marker) {
            entry.1 = text;
        } else {
            self.entries.push((marker, text));
        }
    }

    #[must_use]
    pub fn get(&self, marker: Marker) -> Option<&str> {
        self.entries
            .iter()
            .find(|(m, _)| *m == marker)
            .map(|(_, text)| text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Marker, &str)> {
        self.entries.iter().map(|(m, text)| (*m, text.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_token_format() {
        assert_eq!(Marker::new(0).token(), "{{DEEPWIKI-DIAGRAM-0}}");
        assert_eq!(Marker::new(12).to_string(), "{{DEEPWIKI-DIAGRAM-12}}");
        assert!(Marker::new(3).token().contains(MARKER_SENTINEL));
    }

    #[test]
    fn test_parse_prefix() {
        let text = "{{DEEPWIKI-DIAGRAM-10}} trailing";

        let (marker, len) = Marker::parse_prefix(text).unwrap();

        assert_eq!(marker, Marker::new(10));
        assert_eq!(&text[..len], "{{DEEPWIKI-DIAGRAM-10}}");
    }

    #[test]
    fn test_parse_prefix_rejects_malformed() {
        assert_eq!(Marker::parse_prefix("{{DEEPWIKI-DIAGRAM-}}"), None);
        assert_eq!(Marker::parse_prefix("{{DEEPWIKI-DIAGRAM-1"), None);
        assert_eq!(Marker::parse_prefix("{{DEEPWIKI-DIAGRAM-1x}}"), None);
        assert_eq!(Marker::parse_prefix("text {{DEEPWIKI-DIAGRAM-1}}"), None);
    }

    #[test]
    fn test_mapping_insert_replaces_existing() {
        let mut mapping = RecoveryMapping::new();
        mapping.insert(Marker::new(0), "first".to_owned());
        mapping.insert(Marker::new(1), "other".to_owned());
        mapping.insert(Marker::new(0), "second".to_owned());

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get(Marker::new(0)), Some("second"));
        assert_eq!(mapping.get(Marker::new(2)), None);
    }

    #[test]
    fn test_mapping_preserves_insertion_order() {
        let mut mapping = RecoveryMapping::new();
        mapping.insert(Marker::new(2), "c".to_owned());
        mapping.insert(Marker::new(0), "a".to_owned());

        let markers: Vec<_> = mapping.iter().map(|(m, _)| m.index()).collect();
        assert_eq!(markers, vec![2, 0]);
    }
}
