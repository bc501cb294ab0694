//! `convert` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use dw_config::Config;

use super::{RecoveryArgs, page_converter};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
pub(crate) struct ConvertArgs {
    /// Rendered HTML page to convert.
    input: PathBuf,

    /// Write Markdown to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    pub(crate) recovery: RecoveryArgs,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid, the input cannot be read,
    /// the page has no content, or the output cannot be written.
    pub(crate) fn execute(self, version: &str) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.recovery.config_path(), Some(&self.recovery.settings()))?;
        let html = std::fs::read_to_string(&self.input)?;

        let Some(page) = page_converter(&config, version).convert_page(&html) else {
            return Err(CliError::Validation(format!(
                "no content found in {}",
                self.input.display()
            )));
        };

        for warning in &page.warnings {
            output.warning(warning);
        }

        if let Some(path) = &self.output {
            std::fs::write(path, &page.content)?;
            output.written(path);
        } else {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(page.content.as_bytes())?;
            stdout.flush()?;
        }

        if page.stats.found > 0 {
            output.tally(
                &format!(
                    "Converted {}/{} diagrams",
                    page.stats.converted, page.stats.found
                ),
                page.stats.failed == 0,
            );
        }
        Ok(())
    }
}
