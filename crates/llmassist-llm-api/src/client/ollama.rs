use async_trait::async_trait;
use std::time::Instant;

use llmassist_core::models::TagsResponse;
use llmassist_core::{AssistError, AssistantConfig, GenerateRequest};
use llmassist_logging::{log_request, log_response, log_transport_error};

use crate::client::{HealthStatus, InferenceClient};
use crate::extract::extract_response_text;

/// Client for an Ollama-compatible `/api/generate` endpoint
pub struct OllamaClient {
    endpoint: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
    verbose: bool,
}

impl OllamaClient {
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        let config = AssistantConfig {
            endpoint: endpoint.into(),
            model: model.into(),
            ..Default::default()
        };
        Self::from_config(&config, false)
    }

    /// Build a client from configuration; `verbose` dumps each exchange to the console
    pub fn from_config(config: &AssistantConfig, verbose: bool) -> Self {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        // Builder only fails on TLS backend setup; fall back to the default client
        let client = builder.build().unwrap_or_else(|_| reqwest::Client::new());

        Self {
            endpoint: config.endpoint.trim().to_string(),
            base_url: config.server_base_url(),
            model: config.model_or_default().to_string(),
            client,
            verbose,
        }
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.base_url)
    }
}

#[async_trait]
impl InferenceClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        let request = GenerateRequest::new(self.model.clone(), prompt);
        log_request(&self.endpoint, &request, self.verbose);

        let response = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log_transport_error(&self.endpoint, &e.to_string(), self.verbose);
                AssistError::Connection(e.to_string())
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .text()
            .await
            .map_err(|e| AssistError::Connection(e.to_string()))?;
        log_response(&status, &headers, &body, self.verbose);

        if status != reqwest::StatusCode::OK {
            return Err(AssistError::HttpStatus(status.as_u16()));
        }

        Ok(extract_response_text(&body))
    }

    async fn health_check(&self) -> HealthStatus {
        let start = Instant::now();

        let response = match self.client.get(self.tags_url()).send().await {
            Ok(response) => response,
            Err(e) => return HealthStatus::unreachable(e.to_string()),
        };
        let latency_ms = Some(start.elapsed().as_millis() as u64);

        if !response.status().is_success() {
            return HealthStatus {
                reachable: true,
                latency_ms,
                model_available: None,
                models: Vec::new(),
                error: Some(format!("HTTP {}", response.status().as_u16())),
            };
        }

        match response.json::<TagsResponse>().await {
            Ok(tags) => {
                let models: Vec<String> = tags.models.into_iter().map(|m| m.name).collect();
                // Ollama reports "name:tag"; a bare configured name matches any tag
                let model_available = models.iter().any(|name| {
                    name == &self.model || name.split(':').next() == Some(self.model.as_str())
                });
                HealthStatus {
                    reachable: true,
                    latency_ms,
                    model_available: Some(model_available),
                    models,
                    error: None,
                }
            }
            Err(e) => HealthStatus {
                reachable: true,
                latency_ms,
                model_available: None,
                models: Vec::new(),
                error: Some(format!("Unexpected /api/tags payload: {}", e)),
            },
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_model_uses_default() {
        let client = OllamaClient::new("http://localhost:11434/api/generate", "  ");
        assert_eq!(client.model(), "dolphin-mistral");
        assert_eq!(client.tags_url(), "http://localhost:11434/api/tags");
    }

    #[test]
    fn test_custom_endpoint_kept() {
        let client = OllamaClient::new("http://gpu:8080/api/generate", "llama3");
        assert_eq!(client.endpoint(), "http://gpu:8080/api/generate");
        assert_eq!(client.model(), "llama3");
    }
}
