use anyhow::{Context, Result};
use colored::Colorize;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use llmassist_core::{AssistantConfig, HttpExchange};
use llmassist_llm_api::{InferenceClient, OllamaClient};
use llmassist_logging::ConversationLogger;

use crate::cli::Cli;

/// Application configuration derived from CLI arguments and environment
pub struct AppConfig {
    pub assistant: AssistantConfig,
    pub work_dir: PathBuf,
    pub verbose: bool,
}

impl AppConfig {
    pub fn client(&self) -> Arc<dyn InferenceClient> {
        Arc::new(OllamaClient::from_config(&self.assistant, self.verbose))
    }

    /// Open the conversation log when a log directory is configured
    pub async fn logger(&self) -> Option<ConversationLogger> {
        let dir = self.assistant.log_dir.as_ref()?;
        match ConversationLogger::new(dir).await {
            Ok(logger) => {
                if self.verbose {
                    println!(
                        "{}",
                        format!("📝 Logging conversation to {}", logger.file_path().display()).bright_black()
                    );
                }
                Some(logger)
            }
            Err(e) => {
                eprintln!("Logging disabled: {:#}", e);
                None
            }
        }
    }
}

/// Set up application configuration from CLI arguments.
///
/// Precedence: CLI flags (and their env vars) > config file > defaults
pub fn setup_from_cli(cli: &Cli) -> Result<AppConfig> {
    let work_dir = env::current_dir().context("Failed to determine working directory")?;
    let mut assistant = AssistantConfig::load(cli.config.as_deref(), &work_dir)?;

    if let Some(endpoint) = &cli.endpoint {
        assistant.endpoint = endpoint.clone();
    }
    if let Some(model) = &cli.model {
        assistant.model = model.clone();
    }
    if let Some(cap) = cli.response_cap {
        assistant.response_char_cap = cap;
    }
    if let Some(cap) = cli.request_cap {
        assistant.request_char_cap = cap;
    }
    if cli.timeout_secs.is_some() {
        assistant.timeout_secs = cli.timeout_secs;
    }
    if cli.log_dir.is_some() {
        assistant.log_dir = cli.log_dir.clone();
    }
    assistant.validate()?;

    if cli.verbose {
        println!("{}", format!("🔧 DEBUG: endpoint: {}", assistant.endpoint).bright_black());
        println!("{}", format!("🔧 DEBUG: model: {}", assistant.model_or_default()).bright_black());
    }

    Ok(AppConfig { assistant, work_dir, verbose: cli.verbose })
}

/// Read a captured exchange from disk. Non-UTF-8 bytes are replaced.
pub fn read_exchange(request: &Path, response: Option<&Path>) -> Result<HttpExchange> {
    let request_text = read_lossy(request)?;
    let response_text = response.map(read_lossy).transpose()?;
    Ok(HttpExchange::new(request_text, response_text))
}

fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_read_exchange_with_response() {
        let dir = TempDir::new().unwrap();
        let req = dir.path().join("req.txt");
        let resp = dir.path().join("resp.txt");
        fs::write(&req, "GET /a HTTP/1.1\nHost: h\n").unwrap();
        fs::write(&resp, b"HTTP/1.1 200 OK\n\n\xff").unwrap();

        let exchange = read_exchange(&req, Some(&resp)).unwrap();
        assert_eq!(exchange.target(), "GET h/a");
        assert!(exchange.response.unwrap().ends_with('\u{FFFD}'));
    }

    #[test]
    fn test_read_exchange_missing_file() {
        let err = read_exchange(Path::new("/nonexistent/req.txt"), None).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
