//! Page fetchers: the source of rendered markup.
//!
//! Wiki pages are assembled by client-side scripts, so [`ChromeFetcher`]
//! asks a headless browser for the DOM after the scripts ran. [`HttpFetcher`]
//! returns the raw server response and only helps for pages rendered on the
//! server.

use std::process::Command;
use std::time::Duration;

use dw_diagrams::subprocess::{SubprocessError, run_with_timeout};
use ureq::Agent;

/// Browser-like user agent; some wiki hosts reject unknown clients.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/126.0.0.0 Safari/537.36";

/// Page fetch failure.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Browser could not be started, hung, or could not be waited on.
    #[error("browser error: {0}")]
    Browser(#[from] SubprocessError),

    /// Browser exited unsuccessfully.
    #[error("browser exited with {status}: {stderr}")]
    BrowserFailed { status: String, stderr: String },

    /// Network-level HTTP failure.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Non-success HTTP status.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// Fetch succeeded but returned no markup.
    #[error("empty page: {0}")]
    Empty(String),
}

/// Returns the rendered markup of a page.
pub trait Fetcher: Send + Sync {
    /// Fetch `url` and return its markup.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Headless Chromium, `--dump-dom` after a virtual time budget.
pub struct ChromeFetcher {
    program: String,
    render_wait: Duration,
    timeout: Duration,
}

impl ChromeFetcher {
    #[must_use]
    pub fn new(program: impl Into<String>, render_wait: Duration, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            render_wait,
            timeout,
        }
    }

    fn command(&self, url: &str) -> Command {
        let mut command = Command::new(&self.program);
        command
            .arg("--headless")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg(format!("--virtual-time-budget={}", self.render_wait.as_millis()))
            .arg("--dump-dom")
            .arg(url);
        command
    }
}

impl Fetcher for ChromeFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!(url, "rendering page");
        let output = run_with_timeout(&mut self.command(url), self.timeout)?;

        if !output.status.success() {
            return Err(FetchError::BrowserFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        let html = String::from_utf8_lossy(&output.stdout).into_owned();
        if html.trim().is_empty() {
            return Err(FetchError::Empty(url.to_owned()));
        }
        tracing::debug!(url, bytes = html.len(), "page rendered");
        Ok(html)
    }
}

/// Plain HTTP GET.
pub struct HttpFetcher {
    agent: Agent,
}

impl HttpFetcher {
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::info!(url, "fetching page");
        let response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .call()
            .map_err(|e| FetchError::Http(e.to_string()))?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(FetchError::Status {
                status,
                url: url.to_owned(),
            });
        }

        let html = response
            .into_body()
            .read_to_string()
            .map_err(|e| FetchError::Http(e.to_string()))?;
        if html.trim().is_empty() {
            return Err(FetchError::Empty(url.to_owned()));
        }
        Ok(html)
    }
}
