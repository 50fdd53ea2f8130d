//! # llmassist-llm-api
//!
//! Client for a local inference server speaking the Ollama
//! `/api/generate` protocol.
//!
//! ## Features
//!
//! - **One call per prompt**: non-streaming POST, no retry
//! - **Tolerant extraction**: structured decode of the `response` token,
//!   with the literal-marker fallback and raw-body fallback
//! - **Health check**: reachability and installed-model lookup via `/api/tags`
//!
//! ## Example
//!
//! ```rust,no_run
//! use llmassist_core::AssistantConfig;
//! use llmassist_llm_api::{InferenceClient, OllamaClient};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = OllamaClient::from_config(&AssistantConfig::default(), false);
//!     match client.generate("Say hello").await {
//!         Ok(text) => println!("{}", text),
//!         Err(e) => eprintln!("{}", e),
//!     }
//! }
//! ```

pub mod client;
pub mod extract;

pub use client::{
    InferenceClient,
    HealthStatus,
    ollama::OllamaClient,
};

pub use extract::{extract_response_text, unescape_subset};
