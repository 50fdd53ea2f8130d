//! # llmassist-core
//!
//! The pure building blocks of the assistant:
//! - **Sanitizer**: redacts credential-bearing headers from raw HTTP text
//! - **Context builder**: bounded, labelled request/response documents
//! - **Prompt assembler**: fixed instruction templates per workflow
//! - **Transcript**: speaker-labelled entries with a pending placeholder
//! - **Renderer**: restricted markdown-like subset to HTML
//!
//! Nothing in this crate performs I/O except [`AssistantConfig::load`].
//!
//! ## Example
//!
//! ```rust
//! use llmassist_core::{HttpExchange, LoadedContext, AssistantConfig, Workflow, assemble_prompt};
//!
//! let exchange = HttpExchange::new(
//!     "GET /me HTTP/1.1\nHost: example.com\nAuthorization: Bearer secret\n",
//!     None,
//! );
//! let context = LoadedContext::from_exchange(&exchange, &AssistantConfig::default());
//! let prompt = assemble_prompt(Workflow::Analysis, None, Some(&context)).unwrap();
//! assert!(!prompt.contains("secret"));
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod exchange;
pub mod models;
pub mod prompt;
pub mod render;
pub mod sanitize;
pub mod transcript;

pub use config::{
    AssistantConfig,
    DEFAULT_ENDPOINT,
    DEFAULT_MODEL,
    DEFAULT_CONFIG_FILE,
};
pub use context::{
    build_context_document,
    sanitize_capped,
    chat_request_snippet,
    LoadedContext,
    RESPONSE_CHAR_CAP,
    REQUEST_CHAR_CAP,
    RESPONSE_TRUNCATION_MARKER,
    REQUEST_TRUNCATION_MARKER,
    NO_RESPONSE_MARKER,
};
pub use error::AssistError;
pub use exchange::HttpExchange;
pub use models::{GenerateRequest, GenerateResponse};
pub use prompt::{assemble_prompt, Workflow};
pub use render::{render_document, render_fragment, report_document};
pub use sanitize::sanitize;
pub use transcript::{Speaker, Transcript, TranscriptEntry, THINKING_PLACEHOLDER, SUPERSEDED_MESSAGE};
