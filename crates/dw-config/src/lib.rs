//! Configuration management for deepwiki2md.
//!
//! Parses `deepwiki2md.toml` with serde and discovers it in the current
//! directory or any parent. CLI settings are applied on top via
//! [`CliSettings`], and the merged result is validated.
//!
//! ## Environment Variable Expansion
//!
//! String values support:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `output.dir`
//! - `scrape.chrome_path`
//! - `recovery.base_url`
//! - `recovery.api_key`
//! - `recovery.model`
//! - `render.d2_path`
//!
//! The built-in defaults for `recovery.base_url` and `recovery.api_key` read
//! `OPENAI_API_BASE` and `OPENAI_API_KEY`.

mod expand;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "deepwiki2md.toml";

/// Directory (next to the config file) holding tool state such as the cache.
const PROJECT_DIRNAME: &str = ".deepwiki2md";

/// Upper bound for `recovery.max_workers`.
const MAX_WORKERS: usize = 16;

/// CLI settings that override configuration file values.
///
/// Only `Some` fields override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    pub output_dir: Option<PathBuf>,
    pub fetcher: Option<FetcherKind>,
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub max_workers: Option<usize>,
    /// `Some(false)` disables flowchart recovery.
    pub diagrams_enabled: Option<bool>,
    pub cache_enabled: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration (directory as a relative string from TOML).
    output: OutputConfigRaw,
    /// Page fetching.
    pub scrape: ScrapeConfig,
    /// Flowchart structure recovery.
    pub recovery: RecoveryConfig,
    /// External `d2` renderer.
    pub render: RenderConfig,

    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    dir: Option<String>,
}

/// Resolved output locations.
#[derive(Debug, Default)]
pub struct OutputConfig {
    /// Root directory for generated Markdown.
    pub dir: PathBuf,
    /// Tool state directory (`.deepwiki2md/`).
    pub project_dir: PathBuf,
}

impl OutputConfig {
    /// Recovery cache directory (`.deepwiki2md/cache/`).
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        self.project_dir.join("cache")
    }
}

/// How rendered page markup is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    /// Headless Chromium (`--dump-dom`), runs the page's scripts.
    #[default]
    Chrome,
    /// Plain HTTP GET, for pages that are rendered server-side.
    Http,
}

impl FromStr for FetcherKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "http" => Ok(Self::Http),
            other => Err(ConfigError::Validation(format!(
                "unknown fetcher '{other}' (expected 'chrome' or 'http')"
            ))),
        }
    }
}

impl fmt::Display for FetcherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chrome => f.write_str("chrome"),
            Self::Http => f.write_str("http"),
        }
    }
}

/// Page fetching configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub fetcher: FetcherKind,
    /// Chromium executable.
    pub chrome_path: String,
    /// Pause between page fetches of one library.
    pub page_delay_ms: u64,
    /// Hard limit for one page fetch.
    pub page_timeout_secs: u64,
    /// Virtual time the browser gives the page's scripts before dumping the DOM.
    pub render_wait_ms: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            fetcher: FetcherKind::Chrome,
            chrome_path: "chromium".to_owned(),
            page_delay_ms: 1000,
            page_timeout_secs: 30,
            render_wait_ms: 2000,
        }
    }
}

impl ScrapeConfig {
    #[must_use]
    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }

    #[must_use]
    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }

    #[must_use]
    pub fn render_wait(&self) -> Duration {
        Duration::from_millis(self.render_wait_ms)
    }
}

/// Flowchart recovery configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RecoveryConfig {
    /// Whether flowcharts are converted at all.
    pub enabled: bool,
    /// OpenAI-compatible API root, e.g. `https://api.openai.com/v1`.
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    /// Concurrent recovery requests per document.
    pub max_workers: usize,
    /// Whether recovered descriptions are cached on disk.
    pub cache_enabled: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "${OPENAI_API_BASE:-https://api.openai.com/v1}".to_owned(),
            api_key: "${OPENAI_API_KEY:-dummy-key}".to_owned(),
            model: "gpt-4o-mini".to_owned(),
            temperature: 0.1,
            max_tokens: 2000,
            timeout_secs: 30,
            max_workers: 1,
            cache_enabled: true,
        }
    }
}

impl RecoveryConfig {
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// External `d2` renderer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub d2_path: String,
    pub probe_timeout_secs: u64,
    pub timeout_secs: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            d2_path: "d2".to_owned(),
            probe_timeout_secs: 5,
            timeout_secs: 30,
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`recovery.api_key`").
        field: String,
        /// Error message (e.g., "${`OPENAI_API_KEY`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

fn require_positive(value: u64, field: &str) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::Validation(format!(
            "{field} must be greater than 0"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `deepwiki2md.toml` in the current directory and its parents, and
    /// falls back to defaults relative to the current directory.
    ///
    /// CLI settings are applied after loading, then the result is validated.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit `config_path` doesn't exist, parsing or
    /// env-var expansion fails, or the merged config is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            let mut config = Self::default_with_cwd();
            config.expand_env_vars()?;
            config
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(dir) = &settings.output_dir {
            self.output_resolved.dir.clone_from(dir);
        }
        if let Some(fetcher) = settings.fetcher {
            self.scrape.fetcher = fetcher;
        }
        if let Some(base_url) = &settings.api_base_url {
            self.recovery.base_url.clone_from(base_url);
        }
        if let Some(api_key) = &settings.api_key {
            self.recovery.api_key.clone_from(api_key);
        }
        if let Some(model) = &settings.model {
            self.recovery.model.clone_from(model);
        }
        if let Some(workers) = settings.max_workers {
            self.recovery.max_workers = workers;
        }
        if let Some(enabled) = settings.diagrams_enabled {
            self.recovery.enabled = enabled;
        }
        if let Some(enabled) = settings.cache_enabled {
            self.recovery.cache_enabled = enabled;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    fn default_with_base(base: &Path) -> Self {
        Self {
            output: OutputConfigRaw::default(),
            scrape: ScrapeConfig::default(),
            recovery: RecoveryConfig::default(),
            render: RenderConfig::default(),
            output_resolved: OutputConfig {
                dir: base.join("output"),
                project_dir: base.join(PROJECT_DIRNAME),
            },
            config_path: None,
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand before path resolution so output.dir may reference env vars
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any check fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_scrape()?;
        self.validate_recovery()?;
        self.validate_render()?;
        Ok(())
    }

    fn validate_scrape(&self) -> Result<(), ConfigError> {
        if self.scrape.fetcher == FetcherKind::Chrome {
            require_non_empty(&self.scrape.chrome_path, "scrape.chrome_path")?;
        }
        require_positive(self.scrape.page_timeout_secs, "scrape.page_timeout_secs")?;
        Ok(())
    }

    fn validate_recovery(&self) -> Result<(), ConfigError> {
        // Nothing below is used when recovery is off
        if !self.recovery.enabled {
            return Ok(());
        }

        let recovery = &self.recovery;
        require_non_empty(&recovery.base_url, "recovery.base_url")?;
        require_http_url(&recovery.base_url, "recovery.base_url")?;
        require_non_empty(&recovery.model, "recovery.model")?;
        require_positive(recovery.timeout_secs, "recovery.timeout_secs")?;
        require_positive(u64::from(recovery.max_tokens), "recovery.max_tokens")?;

        if !(0.0..=2.0).contains(&recovery.temperature) {
            return Err(ConfigError::Validation(
                "recovery.temperature must be between 0 and 2".to_owned(),
            ));
        }
        if !(1..=MAX_WORKERS).contains(&recovery.max_workers) {
            return Err(ConfigError::Validation(format!(
                "recovery.max_workers must be between 1 and {MAX_WORKERS}"
            )));
        }
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.render.d2_path, "render.d2_path")?;
        require_positive(self.render.probe_timeout_secs, "render.probe_timeout_secs")?;
        require_positive(self.render.timeout_secs, "render.timeout_secs")?;
        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.output.dir {
            self.output.dir = Some(expand::expand_env(dir, "output.dir")?);
        }
        self.scrape.chrome_path = expand::expand_env(&self.scrape.chrome_path, "scrape.chrome_path")?;
        self.recovery.base_url = expand::expand_env(&self.recovery.base_url, "recovery.base_url")?;
        self.recovery.api_key = expand::expand_env(&self.recovery.api_key, "recovery.api_key")?;
        self.recovery.model = expand::expand_env(&self.recovery.model, "recovery.model")?;
        self.render.d2_path = expand::expand_env(&self.render.d2_path, "render.d2_path")?;
        Ok(())
    }

    /// Resolve relative paths against the config file's directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        self.output_resolved = OutputConfig {
            dir: config_dir.join(self.output.dir.as_deref().unwrap_or("output")),
            project_dir: config_dir.join(PROJECT_DIRNAME),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/work"));

        assert_eq!(config.output_resolved.dir, PathBuf::from("/work/output"));
        assert_eq!(
            config.output_resolved.cache_dir(),
            PathBuf::from("/work/.deepwiki2md/cache")
        );
        assert_eq!(config.scrape.fetcher, FetcherKind::Chrome);
        assert_eq!(config.scrape.page_delay(), Duration::from_secs(1));
        assert_eq!(config.scrape.page_timeout(), Duration::from_secs(30));
        assert!(config.recovery.enabled);
        assert_eq!(config.recovery.model, "gpt-4o-mini");
        assert_eq!(config.recovery.max_tokens, 2000);
        assert_eq!(config.recovery.max_workers, 1);
        assert_eq!(config.recovery.timeout(), Duration::from_secs(30));
        assert_eq!(config.render.d2_path, "d2");
        assert_eq!(config.render.probe_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();

        assert!((config.recovery.temperature - 0.1).abs() < f32::EPSILON);
        assert_eq!(config.scrape.chrome_path, "chromium");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[output]
dir = "docs"

[scrape]
fetcher = "http"
page_delay_ms = 250
render_wait_ms = 5000

[recovery]
base_url = "http://localhost:1234/v1"
api_key = "local"
model = "qwen2.5-coder"
temperature = 0.0
max_workers = 4
cache_enabled = false

[render]
d2_path = "/opt/d2/bin/d2"
timeout_secs = 10
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.output.dir.as_deref(), Some("docs"));
        assert_eq!(config.scrape.fetcher, FetcherKind::Http);
        assert_eq!(config.scrape.page_delay(), Duration::from_millis(250));
        assert_eq!(config.scrape.render_wait(), Duration::from_secs(5));
        assert_eq!(config.recovery.base_url, "http://localhost:1234/v1");
        assert_eq!(config.recovery.model, "qwen2.5-coder");
        assert_eq!(config.recovery.max_workers, 4);
        assert!(!config.recovery.cache_enabled);
        assert_eq!(config.render.d2_path, "/opt/d2/bin/d2");
        assert_eq!(config.render.timeout(), Duration::from_secs(10));
        assert_eq!(config.render.probe_timeout_secs, 5);
    }

    #[test]
    fn test_parse_unknown_fetcher_fails() {
        let result: Result<Config, _> = toml::from_str("[scrape]\nfetcher = \"selenium\"\n");

        assert!(result.is_err());
    }

    #[test]
    fn test_fetcher_kind_from_str() {
        assert_eq!("chrome".parse::<FetcherKind>().unwrap(), FetcherKind::Chrome);
        assert_eq!("HTTP".parse::<FetcherKind>().unwrap(), FetcherKind::Http);
        assert!("wget".parse::<FetcherKind>().is_err());
        assert_eq!(FetcherKind::Http.to_string(), "http");
    }

    #[test]
    fn test_load_resolves_output_relative_to_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(
            &path,
            "[output]\ndir = \"md\"\n\n[recovery]\nbase_url = \"https://llm.example.com/v1\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.output_resolved.dir, dir.path().join("md"));
        assert_eq!(
            config.output_resolved.project_dir,
            dir.path().join(".deepwiki2md")
        );
        assert_eq!(config.config_path, Some(path));
        assert_eq!(config.recovery.base_url, "https://llm.example.com/v1");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("absent.toml");

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[recovery]\nbase_url = \"ftp://example.com\"\n").unwrap();

        let err = Config::load(Some(&path), None).unwrap_err();

        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("recovery.base_url"));
    }

    #[test]
    fn test_load_applies_cli_settings_before_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "[recovery]\nmax_workers = 2\n").unwrap();

        let settings = CliSettings {
            max_workers: Some(64),
            ..CliSettings::default()
        };
        let err = Config::load(Some(&path), Some(&settings)).unwrap_err();

        assert!(err.to_string().contains("recovery.max_workers"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/work"));
        let settings = CliSettings {
            output_dir: Some(PathBuf::from("/elsewhere")),
            fetcher: Some(FetcherKind::Http),
            api_base_url: Some("http://localhost:8080/v1".to_owned()),
            api_key: Some("secret".to_owned()),
            model: Some("llama3".to_owned()),
            max_workers: Some(3),
            diagrams_enabled: Some(false),
            cache_enabled: Some(false),
        };

        config.apply_cli_settings(&settings);

        assert_eq!(config.output_resolved.dir, PathBuf::from("/elsewhere"));
        assert_eq!(config.scrape.fetcher, FetcherKind::Http);
        assert_eq!(config.recovery.base_url, "http://localhost:8080/v1");
        assert_eq!(config.recovery.api_key, "secret");
        assert_eq!(config.recovery.model, "llama3");
        assert_eq!(config.recovery.max_workers, 3);
        assert!(!config.recovery.enabled);
        assert!(!config.recovery.cache_enabled);
    }

    #[test]
    fn test_apply_empty_cli_settings_changes_nothing() {
        let mut config = Config::default_with_base(Path::new("/work"));

        config.apply_cli_settings(&CliSettings::default());

        assert_eq!(config.output_resolved.dir, PathBuf::from("/work/output"));
        assert_eq!(config.scrape.fetcher, FetcherKind::Chrome);
        assert!(config.recovery.enabled);
    }

    #[test]
    fn test_expand_env_vars_defaults() {
        // SAFETY: the variable names are only touched by this test
        unsafe {
            std::env::remove_var("OPENAI_API_BASE");
            std::env::remove_var("OPENAI_API_KEY");
        }
        let mut config = Config::default_with_base(Path::new("/work"));

        config.expand_env_vars().unwrap();

        assert_eq!(config.recovery.base_url, "https://api.openai.com/v1");
        assert_eq!(config.recovery.api_key, "dummy-key");
    }

    #[test]
    fn test_expand_env_vars_missing_required_var() {
        // SAFETY: the variable name is only touched by this test
        unsafe {
            std::env::remove_var("DW_CONFIG_MISSING_KEY");
        }
        let mut config: Config =
            toml::from_str("[recovery]\napi_key = \"${DW_CONFIG_MISSING_KEY}\"\n").unwrap();

        let err = config.expand_env_vars().unwrap_err();

        assert!(matches!(err, ConfigError::EnvVar { .. }));
        assert!(err.to_string().contains("recovery.api_key"));
    }

    /// Assert that validation fails with expected substrings in the error message.
    fn assert_validation_error(config: &Config, expected_substrings: &[&str]) {
        let err = config.validate().unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(_)),
            "Expected ConfigError::Validation, got {err:?}"
        );
        let msg = err.to_string();
        for s in expected_substrings {
            assert!(msg.contains(s), "Expected error to contain '{s}', got: {msg}");
        }
    }

    fn expanded_default() -> Config {
        let mut config = Config::default_with_base(Path::new("/work"));
        config.recovery.base_url = "https://api.openai.com/v1".to_owned();
        config
    }

    #[test]
    fn test_validate_default_config_passes() {
        assert!(expanded_default().validate().is_ok());
    }

    #[test]
    fn test_validate_workers_range() {
        let mut config = expanded_default();
        config.recovery.max_workers = 0;
        assert_validation_error(&config, &["recovery.max_workers", "16"]);

        config.recovery.max_workers = 17;
        assert_validation_error(&config, &["recovery.max_workers"]);

        config.recovery.max_workers = 16;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_temperature_range() {
        let mut config = expanded_default();
        config.recovery.temperature = 2.5;

        assert_validation_error(&config, &["recovery.temperature"]);
    }

    #[test]
    fn test_validate_zero_timeouts() {
        let mut config = expanded_default();
        config.recovery.timeout_secs = 0;
        assert_validation_error(&config, &["recovery.timeout_secs"]);

        let mut config = expanded_default();
        config.render.timeout_secs = 0;
        assert_validation_error(&config, &["render.timeout_secs"]);

        let mut config = expanded_default();
        config.scrape.page_timeout_secs = 0;
        assert_validation_error(&config, &["scrape.page_timeout_secs"]);
    }

    #[test]
    fn test_validate_skips_recovery_when_disabled() {
        let mut config = expanded_default();
        config.recovery.enabled = false;
        config.recovery.base_url = String::new();
        config.recovery.max_workers = 0;

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_chrome_path_only_for_chrome() {
        let mut config = expanded_default();
        config.scrape.chrome_path = String::new();
        assert_validation_error(&config, &["scrape.chrome_path"]);

        config.scrape.fetcher = FetcherKind::Http;
        assert!(config.validate().is_ok());
    }
}
