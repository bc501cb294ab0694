//! Coloured progress output on stderr.
//!
//! Converted Markdown may go to stdout, so every message here goes to stderr.

use std::path::Path;

use console::{Style, Term};

/// Width of the rule printed above each library.
const RULE_WIDTH: usize = 70;

pub(crate) struct Output {
    term: Term,
    done: Style,
    partial: Style,
    failed: Style,
    heading: Style,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            done: Style::new().green(),
            partial: Style::new().yellow(),
            failed: Style::new().red(),
            heading: Style::new().cyan().bold(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        let _ = self.term.write_line(msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        let _ = self.term.write_line(&self.partial.apply_to(msg).to_string());
    }

    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.failed.apply_to(msg).to_string());
    }

    /// Rule followed by the library name.
    pub(crate) fn library(&self, name: &str) {
        let _ = self.term.write_line(&"─".repeat(RULE_WIDTH));
        let _ = self.term.write_line(&self.heading.apply_to(name).to_string());
    }

    /// Count line such as "Scraped 3/4 pages": green when nothing was
    /// lost, yellow otherwise.
    pub(crate) fn tally(&self, msg: &str, complete: bool) {
        let style = if complete { &self.done } else { &self.partial };
        let _ = self.term.write_line(&style.apply_to(msg).to_string());
    }

    pub(crate) fn written(&self, path: &Path) {
        let msg = format!("Wrote {}", path.display());
        let _ = self.term.write_line(&self.done.apply_to(msg).to_string());
    }
}
