//! Internal constants for diagram recovery and rendering.

use std::time::Duration;

/// Default HTTP timeout for text-generation requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for one external render-tool invocation (30 seconds).
pub const DEFAULT_RENDER_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for the render-tool availability probe (5 seconds).
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Default chat model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Low temperature keeps the recovered structure close to the source.
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Default completion budget.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Node descriptions longer than this many characters are truncated in boxes.
pub const MAX_DESCRIPTION_CHARS: usize = 20;

/// Appended to truncated descriptions.
pub const ELLIPSIS: &str = "...";

/// Bumped whenever the recovery prompt changes; part of every cache key.
pub const PROMPT_REVISION: &str = "d2-prompt-1";

/// Upper bound on concurrent recovery requests for one document.
pub const MAX_WORKERS: usize = 16;
