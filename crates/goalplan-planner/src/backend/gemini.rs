use std::fmt;
use std::time::Duration;

use anyhow::bail;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use url::Url;

use super::{LlmError, TextGenerator};
use crate::config::{GenerationConfig, PlannerConfig};

const PROBE_PROMPT: &str = "Say hello";
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(60);

/// Gemini backend: calls the Generative Language REST API
/// (`models/{model}:generateContent`) with an API key.
#[derive(Clone)]
pub struct GeminiBackend {
    http: Client,
    base_url: Url,
    api_key: String,
    model: String,
    timeout: Duration,
}

impl fmt::Debug for GeminiBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiBackend")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl GeminiBackend {
    pub fn new(
        base_url: &str,
        api_key: &str,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.to_string(),
            model: model.to_string(),
            timeout,
        })
    }

    /// Same connection settings, different model.
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Probe each configured model in order and keep the first that answers.
    pub async fn select_model(config: &PlannerConfig, api_key: &str) -> anyhow::Result<Self> {
        let Some(first) = config.gemini_models.first() else {
            bail!("no Gemini models configured");
        };
        let base = Self::new(&config.gemini_base_url, api_key, first, config.timeout())?;

        for model in &config.gemini_models {
            let candidate = base.with_model(model);
            match candidate.preflight_check().await {
                Ok(()) => {
                    info!("gemini: using model {model}");
                    return Ok(candidate);
                }
                Err(e) => warn!("gemini: model {model} failed probe: {e}"),
            }
        }

        bail!(
            "no working Gemini model found (tried: {})",
            config.gemini_models.join(", ")
        )
    }

    fn endpoint(&self) -> Result<Url, LlmError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| LlmError::Config(format!("model endpoint for {}: {e}", self.model)))
    }

    async fn send(&self, body: &Value) -> Result<String, LlmError> {
        let url = self.endpoint()?;
        debug!(model = %self.model, "gemini: sending generateContent request");

        let resp = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Network(e)
                }
            })?;

        let status = resp.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_RETRY_AFTER);
            return Err(LlmError::RateLimited { retry_after });
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("decode body: {e}")))?;
        candidate_text(parsed)
    }
}

#[async_trait]
impl TextGenerator for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    fn model_hint(&self) -> Option<&str> {
        Some(&self.model)
    }

    async fn preflight_check(&self) -> Result<(), LlmError> {
        let config = GenerationConfig {
            max_output_tokens: 16,
            ..GenerationConfig::default()
        };
        self.generate(PROBE_PROMPT, &config).await.map(|_| ())
    }

    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError> {
        self.send(&request_body(prompt, config)).await
    }
}

fn parse_base_url(raw: &str) -> Result<Url, LlmError> {
    let mut normalized = raw.trim().to_string();
    if !normalized.ends_with('/') {
        normalized.push('/');
    }
    Url::parse(&normalized).map_err(|e| LlmError::Config(format!("base url '{raw}': {e}")))
}

fn request_body(prompt: &str, config: &GenerationConfig) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": config,
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Concatenate the text parts of the first candidate.
fn candidate_text(resp: GenerateResponse) -> Result<String, LlmError> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(LlmError::InvalidResponse(format!("prompt blocked: {reason}")));
    }
    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(LlmError::InvalidResponse("no candidates".into()));
    };
    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();
    if text.trim().is_empty() {
        let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
        return Err(LlmError::InvalidResponse(format!(
            "empty candidate (finish reason: {reason})"
        )));
    }
    Ok(text)
}

/// Pull `error.message` out of a Google API error body, or fall back to the raw text.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.chars().take(500).collect())
}
