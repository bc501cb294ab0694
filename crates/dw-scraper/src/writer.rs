//! Markdown persistence.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

const MAX_FILENAME_CHARS: usize = 200;

static UNSAFE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"[\\/*?:"<>|]"#).unwrap());
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Make `name` safe to use as a file or directory name.
///
/// Strips `\ / * ? : " < > |`, turns whitespace runs into `_`, trims dots and
/// spaces from both ends and keeps at most 200 characters.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let stripped = UNSAFE_CHARS.replace_all(name, "");
    let underscored = WHITESPACE.replace_all(&stripped, "_");
    underscored
        .trim_matches(|c| c == '.' || c == ' ')
        .chars()
        .take(MAX_FILENAME_CHARS)
        .collect()
}

/// Writes pages to `{output_dir}/{library}/{title}.md`.
#[derive(Debug, Clone)]
pub struct PageWriter {
    output_dir: PathBuf,
}

impl PageWriter {
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Path a page would be saved to.
    #[must_use]
    pub fn page_path(&self, library: &str, title: &str) -> PathBuf {
        let library = non_empty_or(sanitize_filename(library), "unknown_library");
        let mut filename = non_empty_or(sanitize_filename(title), "untitled");
        if !Path::new(&filename)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
        {
            filename.push_str(".md");
        }
        self.output_dir.join(library).join(filename)
    }

    /// Save `content`, creating the library directory if needed.
    ///
    /// Pages with the same sanitized title overwrite each other.
    pub fn save(&self, library: &str, title: &str, content: &str) -> io::Result<PathBuf> {
        let path = self.page_path(library, title);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, content)?;
        tracing::info!(path = %path.display(), "saved page");
        Ok(path)
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_owned()
    } else {
        value
    }
}
