//! Marker replacement in translated Markdown.
//!
//! Runs after HTML→Markdown translation: every marker token left in the text
//! is swapped for its entry in the [`RecoveryMapping`]. Problems are warnings,
//! never errors. A dropped marker means the translator discarded the region it
//! sat in, and a surviving sentinel means something was not replaced; in both
//! cases the text is still returned.

use crate::marker::{MARKER_OPEN, MARKER_SENTINEL, Marker, RecoveryMapping};

/// Spliced text plus the problems noticed on the way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpliceOutcome {
    pub text: String,
    pub warnings: Vec<String>,
}

/// Replace every marker in `markdown` with its mapped text.
///
/// Replacement is literal and happens in one pass over the input, so mapped
/// text is never rescanned for markers. Markers without a mapping entry are
/// kept as they are.
#[must_use]
pub fn splice(markdown: &str, mapping: &RecoveryMapping) -> SpliceOutcome {
    let mut warnings = Vec::new();

    for (marker, _) in mapping.iter() {
        let count = markdown.matches(marker.token().as_str()).count();
        match count {
            0 => {
                tracing::warn!(%marker, "marker not found in translated markdown");
                warnings.push(format!("diagram marker {marker} not found in markdown"));
            }
            1 => {}
            n => tracing::debug!(%marker, occurrences = n, "marker appears more than once"),
        }
    }

    let text = replace_markers(markdown, mapping);

    let leftover = text.matches(MARKER_SENTINEL).count();
    if leftover > 0 {
        tracing::warn!(count = leftover, "unreplaced diagram markers remain after splicing");
        warnings.push(format!(
            "{leftover} unreplaced diagram marker(s) remain in output"
        ));
    }

    SpliceOutcome { text, warnings }
}

fn replace_markers(markdown: &str, mapping: &RecoveryMapping) -> String {
    if mapping.is_empty() {
        return markdown.to_owned();
    }

    let mut result = String::with_capacity(markdown.len());
    let mut remaining = markdown;

    while let Some(start) = remaining.find(MARKER_OPEN) {
        result.push_str(&remaining[..start]);
        let candidate = &remaining[start..];

        match Marker::parse_prefix(candidate) {
            Some((marker, len)) => {
                let after = &candidate[len..];
                match mapping.get(marker) {
                    Some(text) if text.contains('\n') => {
                        let consumed = push_block(&mut result, text, after);
                        remaining = &after[consumed..];
                    }
                    Some(text) => {
                        result.push_str(text);
                        remaining = after;
                    }
                    None => {
                        result.push_str(&candidate[..len]);
                        remaining = after;
                    }
                }
            }
            None => {
                result.push_str(&candidate[..MARKER_OPEN.len()]);
                remaining = &candidate[MARKER_OPEN.len()..];
            }
        }
    }

    result.push_str(remaining);
    result
}

/// Insert a multi-line block so it occupies whole lines of the container
/// (blockquote, list item) the marker sat in.
///
/// `after` is the text following the marker. Returns how many of its bytes
/// were consumed.
fn push_block(result: &mut String, block: &str, after: &str) -> usize {
    let line_start = result.rfind('\n').map_or(0, |i| i + 1);
    let (container_len, continuation) = container_prefix(&result[line_start..]);
    let lead_start = line_start + container_len;

    let line_end = after.find('\n').unwrap_or(after.len());
    let mut consumed = 0;

    // Emphasis wrapped around the marker alone, e.g. `_{{...}}_`
    let delimiter = emphasis_suffix(&result[lead_start..]).to_owned();
    if !delimiter.is_empty() && after[..line_end].starts_with(&delimiter) {
        result.truncate(result.len() - delimiter.len());
        consumed = delimiter.len();
    }

    if !result[lead_start..].trim().is_empty() {
        let kept = result.trim_end().len();
        result.truncate(kept);
        result.push('\n');
        result.push_str(&continuation);
    }

    for (i, line) in block.lines().enumerate() {
        if i > 0 {
            result.push('\n');
            if line.is_empty() {
                result.push_str(continuation.trim_end());
            } else {
                result.push_str(&continuation);
            }
        }
        result.push_str(line);
    }

    let trailing = &after[consumed..line_end];
    let text = trailing.trim_start();
    if text.is_empty() {
        line_end
    } else {
        result.push('\n');
        result.push_str(&continuation);
        consumed + (trailing.len() - text.len())
    }
}

/// Length of the container markup opening `line` (indentation, `>`, list
/// bullets) and the prefix that continues it on following lines.
fn container_prefix(line: &str) -> (usize, String) {
    let bytes = line.as_bytes();
    let mut pos = 0;
    let mut continuation = String::new();

    while let Some(&byte) = bytes.get(pos) {
        match byte {
            b' ' | b'\t' | b'>' => {
                continuation.push(char::from(byte));
                pos += 1;
            }
            b'*' | b'-' | b'+' if matches!(bytes.get(pos + 1), Some(b' ' | b'\t')) => {
                continuation.push(' ');
                pos += 1;
            }
            b'0'..=b'9' => {
                let digits = bytes[pos..].iter().take_while(|b| b.is_ascii_digit()).count();
                let end = pos + digits;
                let ordered = matches!(bytes.get(end), Some(b'.' | b')'))
                    && matches!(bytes.get(end + 1), Some(b' ' | b'\t'));
                if !ordered {
                    break;
                }
                continuation.extend(std::iter::repeat_n(' ', digits + 1));
                pos = end + 1;
            }
            _ => break,
        }
    }

    (pos, continuation)
}

/// Trailing run of `*` / `_` emphasis delimiters.
fn emphasis_suffix(text: &str) -> &str {
    let stripped = text.trim_end_matches(['*', '_']);
    &text[stripped.len()..]
}
