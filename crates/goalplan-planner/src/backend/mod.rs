pub mod error;
pub mod gemini;
pub mod mock;

use async_trait::async_trait;

pub use error::LlmError;

use crate::config::GenerationConfig;

/// Trait for text-generation providers.
///
/// Each backend encapsulates:
/// - How to reach the model and authenticate
/// - How to translate sampling parameters into its wire format
/// - How to confirm the model actually answers
///
/// The trait does NOT handle:
/// - Prompt assembly (handled by goalplan-prompts)
/// - Parsing or repairing the returned text (handled by extract.rs)
/// - Timeouts and fallback (handled by the planner)
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Human-readable backend name for logging.
    fn name(&self) -> &str;

    /// Optional model hint for logging/display purposes.
    fn model_hint(&self) -> Option<&str> {
        None
    }

    /// Send a minimal request to confirm the backend is usable.
    async fn preflight_check(&self) -> Result<(), LlmError>;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str, config: &GenerationConfig) -> Result<String, LlmError>;
}
