use std::time::Duration;

use clap::Args;
use serde::{Deserialize, Serialize};

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODELS: &[&str] =
    &["gemini-2.0-flash", "gemini-pro-latest", "gemini-2.0-flash-001"];

#[derive(Debug, Clone, Args)]
pub struct PlannerConfig {
    /// Gemini API key. Without it every breakdown uses the built-in fallback plan.
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub gemini_api_key: Option<String>,

    /// Candidate models, tried in order at startup until one answers.
    #[arg(
        long,
        env = "GOALPLAN_GEMINI_MODELS",
        value_delimiter = ',',
        default_value = "gemini-2.0-flash,gemini-pro-latest,gemini-2.0-flash-001"
    )]
    pub gemini_models: Vec<String>,

    /// Base URL of the Generative Language API.
    #[arg(long, env = "GOALPLAN_GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub gemini_base_url: String,

    #[arg(long, default_value = "0.7")]
    pub temperature: f32,

    #[arg(long, default_value = "0.8")]
    pub top_p: f32,

    #[arg(long, default_value = "40")]
    pub top_k: u32,

    #[arg(long, default_value = "2048")]
    pub max_output_tokens: u32,

    /// Upper bound on a single generation call (seconds).
    /// On expiry the breakdown falls back to the built-in plan.
    #[arg(long, env = "GOALPLAN_GENERATE_TIMEOUT", default_value = "60")]
    pub generate_timeout: u64,

    /// Use the first configured model without sending a probe request.
    #[arg(long)]
    pub skip_model_probe: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        let generation = GenerationConfig::default();
        Self {
            gemini_api_key: None,
            gemini_models: DEFAULT_GEMINI_MODELS.iter().map(|m| m.to_string()).collect(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            temperature: generation.temperature,
            top_p: generation.top_p,
            top_k: generation.top_k,
            max_output_tokens: generation.max_output_tokens,
            generate_timeout: 60,
            skip_model_probe: false,
        }
    }
}

impl PlannerConfig {
    pub fn generation(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.temperature,
            top_p: self.top_p,
            top_k: self.top_k,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.generate_timeout)
    }

    /// The API key, if set and not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

/// Sampling parameters sent with every generation request.
///
/// Serializes in the provider's camelCase wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 2048,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        planner: PlannerConfig,
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::parse_from([
            "test",
            "--gemini-api-key",
            "abc",
            "--gemini-models",
            "m1,m2",
            "--temperature",
            "0.2",
            "--generate-timeout",
            "5",
            "--skip-model-probe",
        ]);
        let cfg = cli.planner;
        assert_eq!(cfg.api_key(), Some("abc"));
        assert_eq!(cfg.gemini_models, vec!["m1".to_string(), "m2".to_string()]);
        assert_eq!(cfg.generation().temperature, 0.2);
        assert_eq!(cfg.timeout(), Duration::from_secs(5));
        assert!(cfg.skip_model_probe);
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let cfg = PlannerConfig {
            gemini_api_key: Some("   ".into()),
            ..Default::default()
        };
        assert_eq!(cfg.api_key(), None);
    }

    #[test]
    fn default_generation_parameters() {
        let cfg = PlannerConfig::default();
        assert_eq!(cfg.generation(), GenerationConfig::default());
        assert_eq!(cfg.gemini_models.len(), 3);
        assert_eq!(cfg.gemini_models[0], "gemini-2.0-flash");
    }

    #[test]
    fn generation_config_uses_camel_case() {
        let value = serde_json::to_value(GenerationConfig::default()).unwrap();
        assert_eq!(value["topK"], 40);
        assert_eq!(value["maxOutputTokens"], 2048);
        assert!(value.get("top_k").is_none());
    }
}
