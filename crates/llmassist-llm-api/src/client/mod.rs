use async_trait::async_trait;
use serde::Serialize;

use llmassist_core::AssistError;

pub mod ollama;

/// Result of probing the inference server
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthStatus {
    pub reachable: bool,
    pub latency_ms: Option<u64>,
    /// Whether the configured model is installed; `None` when unknown
    pub model_available: Option<bool>,
    pub models: Vec<String>,
    pub error: Option<String>,
}

impl HealthStatus {
    pub fn unreachable(error: impl Into<String>) -> Self {
        Self {
            reachable: false,
            latency_ms: None,
            model_available: None,
            models: Vec::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.reachable && self.model_available != Some(false)
    }
}

/// A server that turns one prompt into one generated text.
///
/// Implementations perform exactly one attempt per call and never retry.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Send `prompt` and return the extracted generated text
    async fn generate(&self, prompt: &str) -> Result<String, AssistError>;

    /// Check the server without generating anything
    async fn health_check(&self) -> HealthStatus;

    /// Model identifier sent with each request
    fn model(&self) -> &str;

    /// Endpoint the client posts to
    fn endpoint(&self) -> &str;
}
