//! CLI commands.

mod convert;
mod scrape;

pub(crate) use convert::ConvertArgs;
pub(crate) use scrape::ScrapeArgs;

use std::path::{Path, PathBuf};

use clap::Args;
use dw_cache::{Cache, CacheBucket, FileCache, NullCacheBucket};
use dw_config::{CliSettings, Config};
use dw_diagrams::{DiagramConverter, StructureRecoveryClient, probe_d2};
use dw_scraper::PageConverter;

/// Flags shared by every command that runs the diagram pipeline.
#[derive(Args, Debug, Default)]
pub(crate) struct RecoveryArgs {
    /// Path to configuration file (default: auto-discover deepwiki2md.toml).
    #[arg(short, long)]
    pub(crate) config: Option<PathBuf>,

    /// Base URL of the OpenAI-compatible text-generation API.
    #[arg(long)]
    pub(crate) api_base_url: Option<String>,

    /// API key for the text-generation service.
    #[arg(long)]
    pub(crate) api_key: Option<String>,

    /// Model used to recover diagram structure.
    #[arg(long)]
    pub(crate) model: Option<String>,

    /// Parallel diagram recoveries per page (1-16).
    #[arg(long)]
    pub(crate) workers: Option<usize>,

    /// Leave flowcharts untouched.
    #[arg(long)]
    pub(crate) no_diagrams: bool,

    /// Do not read or write the description cache.
    #[arg(long)]
    pub(crate) no_cache: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl RecoveryArgs {
    /// CLI overrides for [`Config::load`]. Boolean switches only override
    /// when given.
    pub(crate) fn settings(&self) -> CliSettings {
        CliSettings {
            api_base_url: self.api_base_url.clone(),
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            max_workers: self.workers,
            diagrams_enabled: self.no_diagrams.then_some(false),
            cache_enabled: self.no_cache.then_some(false),
            ..CliSettings::default()
        }
    }

    pub(crate) fn config_path(&self) -> Option<&Path> {
        self.config.as_deref()
    }
}

/// Build the page converter described by `config`.
pub(crate) fn page_converter(config: &Config, version: &str) -> PageConverter {
    match diagram_converter(config, version) {
        Some(diagrams) => PageConverter::new().with_diagrams(diagrams),
        None => PageConverter::new(),
    }
}

fn diagram_converter(config: &Config, version: &str) -> Option<DiagramConverter> {
    let recovery = &config.recovery;
    if !recovery.enabled {
        tracing::info!("diagram conversion disabled");
        return None;
    }

    let client = StructureRecoveryClient::new(&recovery.base_url, &recovery.api_key)
        .model(&recovery.model)
        .temperature(recovery.temperature)
        .max_tokens(recovery.max_tokens)
        .timeout(recovery.timeout());

    let external = probe_d2(
        &config.render.d2_path,
        config.render.probe_timeout(),
        config.render.timeout(),
    );

    let bucket: Box<dyn CacheBucket> = if recovery.cache_enabled {
        let cache = FileCache::new(config.output_resolved.cache_dir(), version);
        tracing::debug!(path = %cache.root().display(), "using description cache");
        cache.bucket("descriptions")
    } else {
        Box::new(NullCacheBucket)
    };

    Some(
        DiagramConverter::new(Box::new(client))
            .external(external)
            .cache(bucket)
            .max_workers(recovery.max_workers),
    )
}
