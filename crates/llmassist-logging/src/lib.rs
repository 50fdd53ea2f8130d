// Logging module - conversation and request logging
pub mod conversation_logger;
pub mod request_logger;

pub use conversation_logger::ConversationLogger;

pub use request_logger::{
    log_request,
    log_response,
    log_transport_error,
};

/// Safely truncate a string to a maximum number of characters
pub fn safe_truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        // Reserve space for "..." suffix
        let trunc_chars = max_chars.saturating_sub(3);
        format!("{}...", s.chars().take(trunc_chars).collect::<String>())
    }
}
