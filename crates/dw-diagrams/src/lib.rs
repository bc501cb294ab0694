//! Flowchart recovery for deepwiki2md.
//!
//! Wiki pages ship their flowcharts as rendered SVG, which Markdown cannot
//! show. This crate swaps each one for a textual box-and-arrow diagram:
//!
//! 1. [`extract`] cuts flowchart `<svg>` elements out of the page and leaves
//!    [`Marker`] tokens in their place
//! 2. [`StructureRecoveryClient`] asks a chat-completions endpoint to rebuild
//!    the node/edge structure as a D2 description
//! 3. [`text::render`] draws that description as preformatted text, with
//!    [`ExternalRenderer`] as an optional side channel to the `d2` tool
//! 4. [`splice`] puts the rendered text back where each marker ended up after
//!    HTML→Markdown translation
//!
//! [`DiagramConverter`] runs steps 1-3 for a whole document and hands back a
//! [`PreparedDocument`] whose `splice` finishes the job.
//!
//! # Modules
//!
//! - [`description`]: D2 subset parser ([`DiagramGraph`])
//! - [`text`]: textual renderer
//! - [`subprocess`]: blocking process execution with a deadline

mod bridge;
mod cache;
mod consts;
mod converter;
pub mod description;
mod extract;
mod marker;
mod prompt;
mod recovery;
mod splice;
pub mod subprocess;
pub mod text;

pub use bridge::{D2Renderer, ExternalRenderer, RenderError, RenderedArtifact, UnavailableRenderer, probe_d2};
pub use cache::RecoveryKey;
pub use consts::{DEFAULT_RENDER_TIMEOUT, DEFAULT_TIMEOUT, MAX_WORKERS, PROBE_TIMEOUT};
pub use converter::{ConversionStats, DiagramConverter, PreparedDocument};
pub use description::{DiagramGraph, Edge, Node};
pub use extract::{DiagramFragment, Extraction, extract};
pub use marker::{MARKER_SENTINEL, Marker, RecoveryMapping};
pub use prompt::RECOVERY_PROMPT;
pub use recovery::{
    ConversionResult, RecoveryError, StructureRecovery, StructureRecoveryClient,
    extract_description, failure_notice,
};
pub use splice::{SpliceOutcome, splice};
