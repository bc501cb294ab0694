//! Structure recovery through an OpenAI-compatible chat-completions endpoint.
//!
//! One call handles one fragment: the SVG is sent together with
//! [`RECOVERY_PROMPT`](crate::prompt::RECOVERY_PROMPT), and the D2 description
//! is cut out of the free-form reply by [`extract_description`]. Failures are
//! reported in the returned [`ConversionResult`]; nothing is retried here.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use ureq::Agent;

use crate::consts::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT};
use crate::extract::DiagramFragment;
use crate::prompt::user_message;

/// Outcome of converting one fragment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionResult {
    /// Whether a description was recovered.
    pub success: bool,
    /// Recovered D2 description.
    pub description: Option<String>,
    /// Rendered textual diagram (set by the converter after rendering).
    pub diagram: Option<String>,
    /// Why the conversion failed.
    pub error: Option<String>,
}

impl ConversionResult {
    #[must_use]
    pub fn recovered(description: String) -> Self {
        Self {
            success: true,
            description: Some(description),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_diagram(mut self, diagram: String) -> Self {
        self.diagram = Some(diagram);
        self
    }

    /// Text to splice into the document for this fragment.
    ///
    /// The rendered diagram on success, otherwise a fenced failure notice.
    #[must_use]
    pub fn replacement_text(&self) -> String {
        match (&self.diagram, &self.error) {
            (Some(diagram), _) if self.success => diagram.clone(),
            (_, Some(error)) => failure_notice(error),
            _ => failure_notice("no diagram rendered"),
        }
    }
}

/// Fenced block shown in place of a diagram that could not be recovered.
#[must_use]
pub fn failure_notice(error: &str) -> String {
    format!("```\n[conversion failed: {error}]\n```")
}

/// Recovery failure.
#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    /// Endpoint unreachable or the connection failed.
    #[error("transport/endpoint failure: {0}")]
    Transport(String),

    /// No response within the configured timeout.
    #[error("transport/endpoint failure: no response within {}s", .0.as_secs())]
    Timeout(Duration),

    /// Endpoint answered with a non-success status.
    #[error("transport/endpoint failure: HTTP {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body (may contain error details).
        body: String,
    },

    /// Response body was not a chat completion.
    #[error("transport/endpoint failure: malformed response: {0}")]
    Malformed(String),

    /// The reply contained nothing that looks like a description.
    #[error("no diagram structure recovered")]
    NoStructure,
}

/// Anything that can turn a fragment into a recovered description.
///
/// [`StructureRecoveryClient`] talks to a real endpoint; tests substitute
/// canned implementations.
pub trait StructureRecovery: Send + Sync {
    /// Recover the description of one fragment. Must not panic on failure.
    fn recover(&self, fragment: &DiagramFragment) -> ConversionResult;

    /// Identifies the recovery backend in cache keys (e.g. the model name).
    fn cache_scope(&self) -> &str;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct Usage {
    prompt_tokens: Option<u64>,
    completion_tokens: Option<u64>,
    total_tokens: Option<u64>,
}

/// Blocking client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// # Example
///
/// ```ignore
/// use dw_diagrams::{DiagramFragment, StructureRecovery, StructureRecoveryClient};
///
/// let client = StructureRecoveryClient::new("http://localhost:1234/v1", "dummy-key")
///     .model("qwen2.5-coder");
/// let result = client.recover(&DiagramFragment::new(svg));
/// ```
pub struct StructureRecoveryClient {
    base_url: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    agent: Agent,
}

impl StructureRecoveryClient {
    /// Create a client for `base_url` (e.g. `https://api.openai.com/v1`).
    #[must_use]
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: DEFAULT_TIMEOUT,
            agent: create_agent(DEFAULT_TIMEOUT),
        }
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    #[must_use]
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the round-trip timeout. Default is 30 seconds.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.agent = create_agent(timeout);
        self
    }

    /// Send one fragment and return the raw reply text.
    ///
    /// # Errors
    ///
    /// Returns a [`RecoveryError`] for transport failures, timeouts, non-2xx
    /// statuses and bodies that are not chat completions.
    pub fn request_completion(&self, fragment: &DiagramFragment) -> Result<String, RecoveryError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: user_message(fragment.as_str()),
            }],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        tracing::debug!(
            url = %url,
            model = %self.model,
            svg_chars = fragment.len(),
            svg_preview = %preview(fragment.as_str(), 200),
            "sending recovery request"
        );

        let authorization = format!("Bearer {}", self.api_key);
        let response = self
            .agent
            .post(&url)
            .header("Authorization", authorization.as_str())
            .send_json(&request)
            .map_err(|e| match e {
                ureq::Error::Timeout(_) => RecoveryError::Timeout(self.timeout),
                other => RecoveryError::Transport(other.to_string()),
            })?;

        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| RecoveryError::Transport(e.to_string()))?;
        tracing::debug!(status, body_chars = body.len(), "recovery response received");

        if !(200..300).contains(&status) {
            return Err(RecoveryError::Status { status, body });
        }

        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| RecoveryError::Malformed(e.to_string()))?;

        if let Some(usage) = &parsed.usage {
            tracing::info!(
                input = usage.prompt_tokens,
                output = usage.completion_tokens,
                total = usage.total_tokens,
                "recovery token usage"
            );
        }

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| RecoveryError::Malformed("response has no message content".to_owned()))
    }

    /// Request a completion and extract the description from it.
    ///
    /// # Errors
    ///
    /// Everything [`request_completion`](Self::request_completion) returns, plus
    /// [`RecoveryError::NoStructure`] when the reply holds no description.
    pub fn try_recover(&self, fragment: &DiagramFragment) -> Result<String, RecoveryError> {
        let reply = self.request_completion(fragment)?;
        tracing::debug!(reply_preview = %preview(&reply, 300), "extracting description");
        extract_description(&reply).ok_or(RecoveryError::NoStructure)
    }
}

impl StructureRecovery for StructureRecoveryClient {
    fn recover(&self, fragment: &DiagramFragment) -> ConversionResult {
        match self.try_recover(fragment) {
            Ok(description) => ConversionResult::recovered(description),
            Err(e) => {
                tracing::error!(error = %e, "structure recovery failed");
                ConversionResult::failed(e.to_string())
            }
        }
    }

    fn cache_scope(&self) -> &str {
        &self.model
    }
}

fn create_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_owned(),
    }
}

/// Pull the D2 description out of a free-form model reply.
///
/// Precedence:
/// 1. the body of the first fenced block tagged `d2` or untagged
/// 2. every line from the first line containing `:` that is not a heading
///    (`#`) or emphasis (`**`) line, to the end of the reply
///
/// Returns `None` when neither yields non-blank text.
#[must_use]
pub fn extract_description(reply: &str) -> Option<String> {
    if let Some(block) = first_diagram_block(reply) {
        return Some(block);
    }

    tracing::debug!("no d2 code block in reply, trying line heuristic");
    let lines: Vec<&str> = reply
        .lines()
        .skip_while(|line| !starts_description(line))
        .collect();
    let text = lines.join("\n").trim().to_owned();
    (!text.is_empty()).then_some(text)
}

fn starts_description(line: &str) -> bool {
    let line = line.trim_start();
    line.contains(':') && !line.starts_with('#') && !line.starts_with("**")
}

/// Body of the first ```` ```d2 ```` or bare ```` ``` ```` block with content.
fn first_diagram_block(reply: &str) -> Option<String> {
    let mut open: Option<(bool, Vec<&str>)> = None;

    for line in reply.lines() {
        let trimmed = line.trim();
        match open.as_mut() {
            None => {
                if let Some(info) = trimmed.strip_prefix("```") {
                    let info = info.trim();
                    let wanted = info.is_empty() || info.eq_ignore_ascii_case("d2");
                    open = Some((wanted, Vec::new()));
                }
            }
            Some((wanted, body)) => {
                if trimmed == "```" {
                    let text = body.join("\n").trim().to_owned();
                    if *wanted && !text.is_empty() {
                        return Some(text);
                    }
                    open = None;
                } else {
                    body.push(line);
                }
            }
        }
    }
    None
}
