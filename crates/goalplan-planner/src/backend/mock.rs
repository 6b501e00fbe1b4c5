use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{LlmError, TextGenerator};
use crate::config::GenerationConfig;

enum Reply {
    Text(String),
    Error { status: u16, message: String },
}

/// A mock backend for testing that returns a preconfigured reply and
/// records what it was asked.
pub struct MockBackend {
    reply: Reply,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockBackend {
    /// Create a mock that answers every prompt with `text`.
    pub fn success(text: &str) -> Self {
        Self::with_reply(Reply::Text(text.to_string()))
    }

    /// Create a mock whose calls fail with an API error.
    pub fn failure(status: u16, message: &str) -> Self {
        Self::with_reply(Reply::Error {
            status,
            message: message.to_string(),
        })
    }

    /// Sleep for `delay` before replying.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().ok().and_then(|p| p.clone())
    }

    fn with_reply(reply: Reply) -> Self {
        Self {
            reply,
            delay: None,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }
}

#[async_trait]
impl TextGenerator for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn preflight_check(&self) -> Result<(), LlmError> {
        Ok(())
    }

    async fn generate(&self, prompt: &str, _config: &GenerationConfig) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_prompt.lock() {
            *last = Some(prompt.to_string());
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Error { status, message } => Err(LlmError::ApiError {
                status: *status,
                message: message.clone(),
            }),
        }
    }
}
