//! Wiki URL parsing.

use url::Url;

/// A wiki URL split into the parts the scraper needs.
///
/// Parsing never fails: malformed input produces a URL with an empty domain
/// that reports itself as invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiUrl {
    raw: String,
    parsed: Option<Url>,
}

impl WikiUrl {
    #[must_use]
    pub fn parse(url: &str) -> Self {
        let raw = url.trim().trim_end_matches('/').to_owned();
        let parsed = Url::parse(&raw).ok();
        Self { raw, parsed }
    }

    /// The URL as given, without trailing slashes.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Host and port, e.g. `deepwiki.com`.
    #[must_use]
    pub fn domain(&self) -> String {
        self.parsed
            .as_ref()
            .and_then(|url| {
                url.host_str().map(|host| match url.port() {
                    Some(port) => format!("{host}:{port}"),
                    None => host.to_owned(),
                })
            })
            .unwrap_or_default()
    }

    /// Non-empty path segments.
    #[must_use]
    pub fn path_parts(&self) -> Vec<&str> {
        self.parsed
            .as_ref()
            .map(|url| url.path().split('/').filter(|part| !part.is_empty()).collect())
            .unwrap_or_default()
    }

    /// Library name: the second path segment (`/<owner>/<library>`), or the
    /// only one.
    #[must_use]
    pub fn library_name(&self) -> Option<&str> {
        let parts = self.path_parts();
        match parts.as_slice() {
            [] => None,
            [only] => Some(*only),
            [_, second, ..] => Some(*second),
        }
    }

    /// Whether this looks like a page of a DeepWiki site.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let domain = self.domain();
        domain.to_ascii_lowercase().contains("deepwiki") && !self.path_parts().is_empty()
    }

    /// `scheme://host[:port]`, the base for resolving navigation links.
    #[must_use]
    pub fn base_url(&self) -> String {
        match &self.parsed {
            Some(url) if !self.domain().is_empty() => format!("{}://{}", url.scheme(), self.domain()),
            _ => String::new(),
        }
    }
}
