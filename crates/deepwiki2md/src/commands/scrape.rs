//! `scrape` command implementation.

use std::path::PathBuf;

use clap::Args;
use dw_config::{CliSettings, Config, FetcherKind};
use dw_scraper::{
    ChromeFetcher, Fetcher, HttpFetcher, LibraryReport, LibraryScraper, PageWriter, ScrapeError,
    WikiUrl,
};

use super::{RecoveryArgs, page_converter};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the scrape command.
#[derive(Args)]
pub(crate) struct ScrapeArgs {
    /// DeepWiki library URLs (e.g. `https://deepwiki.com/owner/repo`).
    #[arg(required = true)]
    urls: Vec<String>,

    /// Output directory (default: from config or "output").
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// How pages are fetched.
    #[arg(long)]
    fetcher: Option<FetcherKind>,

    #[command(flatten)]
    pub(crate) recovery: RecoveryArgs,
}

/// Totals across all libraries of one run.
#[derive(Debug, Default, PartialEq, Eq)]
struct RunSummary {
    libraries: usize,
    failed_libraries: usize,
    pages: usize,
    attempted: usize,
    diagrams_found: usize,
    diagrams_converted: usize,
}

impl RunSummary {
    fn from_results(results: &[Result<LibraryReport, ScrapeError>]) -> Self {
        let mut summary = Self {
            libraries: results.len(),
            ..Self::default()
        };
        for result in results {
            match result {
                Ok(report) => {
                    let stats = report.diagram_stats();
                    summary.pages += report.pages.len();
                    summary.attempted += report.attempted;
                    summary.diagrams_found += stats.found;
                    summary.diagrams_converted += stats.converted;
                }
                Err(_) => summary.failed_libraries += 1,
            }
        }
        summary
    }
}

impl ScrapeArgs {
    /// Execute the scrape command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or none of the URLs is a
    /// DeepWiki URL. Failures of individual libraries or pages are reported
    /// but do not fail the command.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        if !self.urls.iter().any(|url| WikiUrl::parse(url).is_valid()) {
            return Err(CliError::Validation(
                "none of the given URLs is a DeepWiki library URL".to_owned(),
            ));
        }

        let settings = CliSettings {
            output_dir: self.output.clone(),
            fetcher: self.fetcher,
            ..self.recovery.settings()
        };
        let config = Config::load(self.recovery.config_path(), Some(&settings))?;

        if let Some(config_path) = &config.config_path {
            output.info(&format!("Using config: {}", config_path.display()));
        }
        if !config.recovery.enabled {
            output.warning("Diagram conversion disabled");
        }

        let writer = PageWriter::new(config.output_resolved.dir.clone());
        output.info(&format!("Output directory: {}", writer.output_dir().display()));

        let scraper = LibraryScraper::new(fetcher(&config), page_converter(&config, version))
            .writer(writer)
            .page_delay(config.scrape.page_delay());

        let results = scraper.scrape_libraries(&self.urls);

        for (url, result) in self.urls.iter().zip(&results) {
            match result {
                Ok(report) => report_library(&output, report),
                Err(e) => {
                    output.library(url);
                    output.error(&e.to_string());
                }
            }
        }

        let summary = RunSummary::from_results(&results);
        output.library("Total");
        output.tally(
            &format!(
                "Scraped {}/{} pages from {}/{} libraries",
                summary.pages,
                summary.attempted,
                summary.libraries - summary.failed_libraries,
                summary.libraries
            ),
            summary.failed_libraries == 0 && summary.pages == summary.attempted,
        );
        if summary.diagrams_found > 0 {
            output.tally(
                &format!(
                    "Converted {}/{} diagrams",
                    summary.diagrams_converted, summary.diagrams_found
                ),
                summary.diagrams_converted == summary.diagrams_found,
            );
        }

        Ok(())
    }
}

fn fetcher(config: &Config) -> Box<dyn Fetcher> {
    match config.scrape.fetcher {
        FetcherKind::Chrome => Box::new(ChromeFetcher::new(
            &config.scrape.chrome_path,
            config.scrape.render_wait(),
            config.scrape.page_timeout(),
        )),
        FetcherKind::Http => Box::new(HttpFetcher::new(config.scrape.page_timeout())),
    }
}

fn report_library(output: &Output, report: &LibraryReport) {
    output.library(&report.library);
    let stats = report.diagram_stats();
    let line = format!(
        "Scraped {}/{} pages ({}/{} diagrams converted)",
        report.pages.len(),
        report.attempted,
        stats.converted,
        stats.found
    );
    output.tally(&line, report.pages.len() == report.attempted);
    if report.saved < report.pages.len() {
        output.warning(&format!(
            "Saved only {} of {} converted pages",
            report.saved,
            report.pages.len()
        ));
    }
    if stats.failed > 0 {
        output.warning(&format!(
            "{} diagram(s) left as conversion-failure notices",
            stats.failed
        ));
    }
}
