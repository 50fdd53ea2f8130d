//! Bounded context documents built from a request/response pair.

use crate::config::AssistantConfig;
use crate::exchange::HttpExchange;
use crate::sanitize::sanitize;

/// Default cap on captured response text, in characters
pub const RESPONSE_CHAR_CAP: usize = 90_000;

/// Default cap on request text for the chat workflow, in characters
pub const REQUEST_CHAR_CAP: usize = 3_000;

pub const RESPONSE_TRUNCATION_MARKER: &str = "...[TRUNCATED BY EXTENSION]...";
pub const REQUEST_TRUNCATION_MARKER: &str = "...[TRUNCATED]";
pub const NO_RESPONSE_MARKER: &str = "[No Response Captured]";

/// Sanitize at most `cap` characters of `text`, appending `marker` when cut.
///
/// Counts Unicode scalar values, so multi-byte characters are never split.
/// The marker goes on after redaction; a cut inside a credential value must
/// not take the marker with it.
pub fn sanitize_capped(text: &str, cap: usize, marker: &str) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_idx, _)) => format!("{}{}", sanitize(&text[..byte_idx]), marker),
        None => sanitize(text),
    }
}

/// Build the labelled document used by the analysis and report workflows.
///
/// Only the response is capped; both sides are sanitized.
pub fn build_context_document(request: &str, response: Option<&str>, response_cap: usize) -> String {
    let safe_request = sanitize(request);
    let safe_response = match response {
        Some(resp) => sanitize_capped(resp, response_cap, RESPONSE_TRUNCATION_MARKER),
        None => NO_RESPONSE_MARKER.to_string(),
    };

    format!(
        "=== HTTP REQUEST ===\n{}\n\n=== HTTP RESPONSE ===\n{}",
        safe_request, safe_response
    )
}

/// Request text for the chat workflow, capped at `request_cap` characters and sanitized
pub fn chat_request_snippet(request: &str, request_cap: usize) -> String {
    sanitize_capped(request, request_cap, REQUEST_TRUNCATION_MARKER)
}

/// Context held by a panel between calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedContext {
    /// Short label such as `GET example.com/login`
    pub target: String,
    /// Request + response document for analysis and report prompts
    pub document: String,
    /// Truncated request for chat prompts
    pub chat_request: String,
}

impl LoadedContext {
    pub fn from_exchange(exchange: &HttpExchange, config: &AssistantConfig) -> Self {
        Self {
            target: exchange.target(),
            document: build_context_document(
                &exchange.request,
                exchange.response.as_deref(),
                config.response_char_cap,
            ),
            chat_request: chat_request_snippet(&exchange.request, config.request_char_cap),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_response_over_cap_truncated() {
        let response = "a".repeat(RESPONSE_CHAR_CAP + 1);
        let doc = build_context_document("GET / HTTP/1.1", Some(&response), RESPONSE_CHAR_CAP);
        let expected_tail = format!("{}{}", "a".repeat(RESPONSE_CHAR_CAP), RESPONSE_TRUNCATION_MARKER);
        assert!(doc.ends_with(&expected_tail));
        assert!(!doc.contains(&"a".repeat(RESPONSE_CHAR_CAP + 1)));
    }

    #[test]
    fn test_response_at_cap_untouched() {
        let response = "b".repeat(RESPONSE_CHAR_CAP);
        let doc = build_context_document("GET / HTTP/1.1", Some(&response), RESPONSE_CHAR_CAP);
        assert!(doc.ends_with(&response));
        assert!(!doc.contains(RESPONSE_TRUNCATION_MARKER));
    }

    #[test]
    fn test_missing_response_marker() {
        let doc = build_context_document("GET / HTTP/1.1", None, RESPONSE_CHAR_CAP);
        assert_eq!(
            doc,
            "=== HTTP REQUEST ===\nGET / HTTP/1.1\n\n=== HTTP RESPONSE ===\n[No Response Captured]"
        );
    }

    #[test]
    fn test_request_is_not_capped_in_document() {
        let request = "r".repeat(RESPONSE_CHAR_CAP * 2);
        let doc = build_context_document(&request, None, RESPONSE_CHAR_CAP);
        assert!(doc.contains(&request));
    }

    #[test]
    fn test_both_sides_sanitized() {
        let doc = build_context_document(
            "GET / HTTP/1.1\nCookie: sid=1\n",
            Some("HTTP/1.1 200 OK\nX-API-Key: leaked\n"),
            RESPONSE_CHAR_CAP,
        );
        assert!(!doc.contains("sid=1"));
        assert!(!doc.contains("leaked"));
    }

    #[test]
    fn test_sanitize_capped_multibyte() {
        let text = "héllo wörld";
        assert_eq!(sanitize_capped(text, 2, "~"), "hé~");
        assert_eq!(sanitize_capped(text, 11, "~"), text);
        assert_eq!(sanitize_capped(text, 50, "~"), text);
    }

    #[test]
    fn test_cap_inside_cookie_keeps_request_marker() {
        let request = format!(
            "GET / HTTP/1.1\nHost: a\nCookie: {}\nAccept: */*\n",
            "c".repeat(5_000)
        );
        let snippet = chat_request_snippet(&request, REQUEST_CHAR_CAP);
        assert_eq!(
            snippet,
            format!("GET / HTTP/1.1\nHost: a\nCookie: [REDACTED_COOKIE]{}", REQUEST_TRUNCATION_MARKER)
        );
    }

    #[test]
    fn test_cap_inside_api_key_keeps_response_marker() {
        let response = format!("HTTP/1.1 200 OK\nX-API-Key: {}", "k".repeat(200));
        let doc = build_context_document("GET / HTTP/1.1", Some(&response), 50);
        assert!(doc.ends_with(&format!(
            "X-API-Key: [REDACTED_API_KEY]{}",
            RESPONSE_TRUNCATION_MARKER
        )));
        assert!(!doc.contains("kkk"));
    }

    #[test]
    fn test_chat_snippet_truncated_and_sanitized() {
        let request = format!("GET / HTTP/1.1\nAuthorization: Bearer xyz\n{}", "p".repeat(5_000));
        let snippet = chat_request_snippet(&request, REQUEST_CHAR_CAP);
        assert!(snippet.ends_with(REQUEST_TRUNCATION_MARKER));
        assert!(!snippet.contains("xyz"));
        assert!(snippet.contains("Authorization: Bearer [REDACTED_TOKEN]"));
    }

    #[test]
    fn test_loaded_context_from_exchange() {
        let exchange = HttpExchange::new("GET /a HTTP/1.1\nHost: example.com\n", Some("HTTP/1.1 204 No Content\n".to_string()));
        let context = LoadedContext::from_exchange(&exchange, &AssistantConfig::default());
        assert_eq!(context.target, "GET example.com/a");
        assert!(context.document.contains("=== HTTP RESPONSE ===\nHTTP/1.1 204 No Content"));
        assert_eq!(context.chat_request, "GET /a HTTP/1.1\nHost: example.com\n");
    }
}
