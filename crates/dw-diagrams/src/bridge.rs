//! Optional hand-off to the external `d2` renderer.
//!
//! [`probe_d2`] runs once at startup and picks either a [`D2Renderer`] or an
//! [`UnavailableRenderer`]; the rest of the pipeline only sees
//! [`ExternalRenderer`]. The artifact is not embedded in Markdown. A render
//! attempt is a success/failure signal that gets logged, and the textual
//! diagram is used either way.

use std::io::{self, Write};
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tempfile::TempPath;

use crate::subprocess::{SubprocessError, run_with_timeout};

/// A rendered file that is deleted when dropped.
#[derive(Debug)]
pub struct RenderedArtifact {
    path: TempPath,
}

impl RenderedArtifact {
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// External render failure.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("temporary file error: {0}")]
    TempFile(#[from] io::Error),

    #[error(transparent)]
    Subprocess(#[from] SubprocessError),

    #[error("{program} exited with {status}: {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },
}

/// Renderer for D2 descriptions outside the process.
pub trait ExternalRenderer: Send + Sync {
    /// Whether the tool was found by the startup probe.
    fn available(&self) -> bool;

    /// Render `description`, returning the artifact on success.
    fn try_render(&self, description: &str) -> Option<RenderedArtifact>;
}

/// Stand-in used when no renderer is installed. Declines every request.
pub struct UnavailableRenderer;

impl ExternalRenderer for UnavailableRenderer {
    fn available(&self) -> bool {
        false
    }

    fn try_render(&self, _description: &str) -> Option<RenderedArtifact> {
        None
    }
}

/// Shells out to `d2 --sketch <input> <output>`.
pub struct D2Renderer {
    program: String,
    timeout: Duration,
}

impl D2Renderer {
    #[must_use]
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Render into a temporary SVG.
    ///
    /// The input file is removed before returning; the output file is removed
    /// on error or when the returned artifact is dropped.
    pub fn render(&self, description: &str) -> Result<RenderedArtifact, RenderError> {
        let mut input = tempfile::Builder::new()
            .prefix("deepwiki2md-")
            .suffix(".d2")
            .tempfile()?;
        input.write_all(description.as_bytes())?;
        input.flush()?;

        let output = tempfile::Builder::new()
            .prefix("deepwiki2md-")
            .suffix(".svg")
            .tempfile()?
            .into_temp_path();

        let result = run_with_timeout(
            Command::new(&self.program)
                .arg("--sketch")
                .arg(input.path())
                .arg(&*output),
            self.timeout,
        )?;

        if !result.status.success() {
            return Err(RenderError::Failed {
                program: self.program.clone(),
                status: result.status.to_string(),
                stderr: String::from_utf8_lossy(&result.stderr).trim().to_owned(),
            });
        }

        Ok(RenderedArtifact { path: output })
    }
}

impl ExternalRenderer for D2Renderer {
    fn available(&self) -> bool {
        true
    }

    fn try_render(&self, description: &str) -> Option<RenderedArtifact> {
        match self.render(description) {
            Ok(artifact) => {
                tracing::debug!(path = %artifact.path().display(), "d2 render succeeded");
                Some(artifact)
            }
            Err(e) => {
                tracing::warn!(error = %e, "d2 render failed");
                None
            }
        }
    }
}

/// Probe for `program --version` and pick a renderer accordingly.
///
/// Called once per run; the result stands for the lifetime of the returned
/// renderer.
#[must_use]
pub fn probe_d2(
    program: &str,
    probe_timeout: Duration,
    render_timeout: Duration,
) -> Box<dyn ExternalRenderer> {
    match run_with_timeout(Command::new(program).arg("--version"), probe_timeout) {
        Ok(output) if output.status.success() => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_owned();
            tracing::info!(program, version = %version, "external d2 renderer available");
            Box::new(D2Renderer::new(program, render_timeout))
        }
        Ok(output) => {
            tracing::debug!(program, status = %output.status, "d2 probe failed");
            Box::new(UnavailableRenderer)
        }
        Err(e) => {
            tracing::debug!(program, error = %e, "d2 not available");
            Box::new(UnavailableRenderer)
        }
    }
}
