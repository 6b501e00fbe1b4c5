use std::sync::Arc;
use std::time::Duration;

use goalplan_core::{Breakdown, MAX_TASK_DAYS};
use goalplan_prompts::build_prompt;
use tracing::{debug, info, warn};

use crate::backend::gemini::GeminiBackend;
use crate::backend::{LlmError, TextGenerator};
use crate::config::{GenerationConfig, PlannerConfig};
use crate::extract::extract;
use crate::fallback::fallback;
use crate::timeline::validate;

/// The text-generation provider the planner talks to, if any.
#[derive(Clone)]
pub enum Provider {
    /// No usable model; every breakdown is the built-in fallback.
    Unavailable { reason: String },
    Available(Arc<dyn TextGenerator>),
}

impl Provider {
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Provider::Unavailable {
            reason: reason.into(),
        }
    }

    /// Build the Gemini provider from configuration.
    ///
    /// Never fails: a missing key, a bad base URL or models that all fail
    /// their probe leave the planner in fallback-only mode.
    pub async fn connect(config: &PlannerConfig) -> Self {
        let Some(api_key) = config.api_key() else {
            info!("no Gemini API key configured; breakdowns will use the fallback plan");
            return Provider::unavailable("no Gemini API key configured");
        };

        if config.skip_model_probe {
            let Some(model) = config.gemini_models.first() else {
                return Provider::unavailable("no Gemini models configured");
            };
            return match GeminiBackend::new(
                &config.gemini_base_url,
                api_key,
                model,
                config.timeout(),
            ) {
                Ok(backend) => {
                    info!("gemini: using model {model} (probe skipped)");
                    Provider::Available(Arc::new(backend))
                }
                Err(e) => {
                    warn!("gemini: {e}; breakdowns will use the fallback plan");
                    Provider::unavailable(e.to_string())
                }
            };
        }

        match GeminiBackend::select_model(config, api_key).await {
            Ok(backend) => Provider::Available(Arc::new(backend)),
            Err(e) => {
                warn!("gemini: {e}; breakdowns will use the fallback plan");
                Provider::unavailable(e.to_string())
            }
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Provider::Available(_))
    }

    /// Short label for logs, e.g. `gemini (gemini-2.0-flash)` or `fallback only`.
    pub fn describe(&self) -> String {
        match self {
            Provider::Unavailable { .. } => "fallback only".to_string(),
            Provider::Available(backend) => match backend.model_hint() {
                Some(model) => format!("{} ({model})", backend.name()),
                None => backend.name().to_string(),
            },
        }
    }
}

/// Why a breakdown came from the fallback generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    ProviderUnavailable,
    ProviderFailed,
    MalformedOutput,
    EmptyBreakdown,
}

impl FallbackReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackReason::ProviderUnavailable => "provider_unavailable",
            FallbackReason::ProviderFailed => "provider_failed",
            FallbackReason::MalformedOutput => "malformed_output",
            FallbackReason::EmptyBreakdown => "empty_breakdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanSource {
    Model {
        backend: String,
        model: Option<String>,
    },
    Fallback(FallbackReason),
}

/// A breakdown together with where it came from.
#[derive(Debug, Clone)]
pub struct Plan {
    pub tasks: Breakdown,
    pub source: PlanSource,
}

/// Turns a goal and a deadline into a scheduled task breakdown.
///
/// Total over `deadline_days >= 1`: provider errors, timeouts and unusable
/// output all end in the fallback plan rather than an error.
pub struct Planner {
    provider: Provider,
    generation: GenerationConfig,
    timeout: Duration,
}

impl Planner {
    pub fn new(provider: Provider, config: &PlannerConfig) -> Self {
        Self {
            provider,
            generation: config.generation(),
            timeout: config.timeout(),
        }
    }

    /// A planner with no provider, for tests and offline use.
    pub fn fallback_only() -> Self {
        Self::new(
            Provider::unavailable("fallback only"),
            &PlannerConfig::default(),
        )
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    pub async fn generate_breakdown(&self, goal_description: &str, deadline_days: i64) -> Breakdown {
        self.plan(goal_description, deadline_days).await.tasks
    }

    pub async fn plan(&self, goal_description: &str, deadline_days: i64) -> Plan {
        let deadline_days = deadline_days.clamp(1, MAX_TASK_DAYS);

        let backend = match &self.provider {
            Provider::Unavailable { reason } => {
                debug!("planner: provider unavailable ({reason})");
                return fallback_plan(
                    goal_description,
                    deadline_days,
                    FallbackReason::ProviderUnavailable,
                );
            }
            Provider::Available(backend) => backend,
        };

        let prompt = build_prompt(goal_description, deadline_days);
        let call = backend.generate(&prompt, &self.generation);
        let result = match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.timeout)),
        };

        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                if e.is_auth() {
                    warn!("planner: {} rejected the credentials ({e}); check GEMINI_API_KEY", backend.name());
                } else {
                    warn!("planner: {} call failed: {e}", backend.name());
                }
                return fallback_plan(
                    goal_description,
                    deadline_days,
                    FallbackReason::ProviderFailed,
                );
            }
        };
        debug!(raw = %raw, "planner: raw model output");

        let Some(tasks) = extract(&raw) else {
            warn!("planner: model output is not a JSON task array");
            debug!(raw = %raw, "planner: unusable model output");
            return fallback_plan(
                goal_description,
                deadline_days,
                FallbackReason::MalformedOutput,
            );
        };
        if tasks.is_empty() {
            warn!("planner: model returned an empty task array");
            return fallback_plan(
                goal_description,
                deadline_days,
                FallbackReason::EmptyBreakdown,
            );
        }

        let tasks = validate(tasks, deadline_days);
        info!(
            count = tasks.len(),
            deadline_days, "planner: breakdown generated by {}", backend.name()
        );
        Plan {
            tasks,
            source: PlanSource::Model {
                backend: backend.name().to_string(),
                model: backend.model_hint().map(str::to_string),
            },
        }
    }
}

fn fallback_plan(goal_description: &str, deadline_days: i64, reason: FallbackReason) -> Plan {
    warn!(reason = reason.as_str(), "planner: using fallback plan");
    Plan {
        tasks: validate(fallback(goal_description, deadline_days), deadline_days),
        source: PlanSource::Fallback(reason),
    }
}
