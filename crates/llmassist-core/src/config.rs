use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::context::{REQUEST_CHAR_CAP, RESPONSE_CHAR_CAP};
use crate::error::AssistError;

/// Default local inference endpoint (Ollama generate API)
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434/api/generate";

/// Model used when none (or a blank one) is configured
pub const DEFAULT_MODEL: &str = "dolphin-mistral";

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "llmassist.toml";

/// Runtime configuration for the assistant.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes:
///
/// ```toml
/// endpoint = "http://gpu-box:11434/api/generate"
/// model = "llama3"
/// response_char_cap = 50000
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssistantConfig {
    /// Full URL of the generate endpoint
    pub endpoint: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Responses longer than this many characters are truncated
    pub response_char_cap: usize,
    /// Chat workflow truncates the request to this many characters
    pub request_char_cap: usize,
    /// Optional HTTP timeout; none means wait for the server
    pub timeout_secs: Option<u64>,
    /// Directory for the JSONL conversation log; logging is off when unset
    pub log_dir: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            response_char_cap: RESPONSE_CHAR_CAP,
            request_char_cap: REQUEST_CHAR_CAP,
            timeout_secs: None,
            log_dir: None,
        }
    }
}

impl AssistantConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, AssistError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AssistError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
            .map_err(|e| AssistError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Parse configuration from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self, AssistError> {
        let config: AssistantConfig = toml::from_str(content)
            .map_err(|e| AssistError::Config(e.message().to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `path` if given, else `llmassist.toml` in `dir` if present, else defaults
    pub fn load(path: Option<&Path>, dir: &Path) -> Result<Self, AssistError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => {
                let candidate = dir.join(DEFAULT_CONFIG_FILE);
                if candidate.exists() {
                    Self::load_from_file(candidate)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<(), AssistError> {
        let endpoint = self.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            return Err(AssistError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.response_char_cap == 0 || self.request_char_cap == 0 {
            return Err(AssistError::Config("character caps must be greater than zero".to_string()));
        }
        Ok(())
    }

    /// The model to send, falling back to [`DEFAULT_MODEL`] when blank
    pub fn model_or_default(&self) -> &str {
        let model = self.model.trim();
        if model.is_empty() {
            DEFAULT_MODEL
        } else {
            model
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Base URL of the inference server, without the generate path
    pub fn server_base_url(&self) -> String {
        let endpoint = self.endpoint.trim().trim_end_matches('/');
        endpoint
            .strip_suffix("/api/generate")
            .unwrap_or(endpoint)
            .to_string()
    }
}
