//! Pulling the generated text out of a generate response body.
//!
//! The `response` field is taken as its raw JSON token and decoded with a
//! deliberately small escape set (see [`unescape_subset`]), which keeps
//! output identical to recorded fixtures from older clients. Anything
//! outside that set, such as `\u0026`, is left as written.

use serde::Deserialize;
use serde_json::value::RawValue;

const RESPONSE_MARKER: &str = "\"response\":\"";
const DONE_MARKER: &str = "\",\"done\"";

#[derive(Deserialize)]
struct Envelope<'a> {
    #[serde(borrow)]
    response: &'a RawValue,
    #[allow(dead_code)]
    done: bool,
}

/// Generated text from `body`, or `body` itself when it has no recognisable
/// `response`/`done` pair.
pub fn extract_response_text(body: &str) -> String {
    structured_segment(body)
        .or_else(|| marker_segment(body))
        .map(unescape_subset)
        .unwrap_or_else(|| body.to_string())
}

/// Raw string token of `response` from a well-formed envelope
fn structured_segment(body: &str) -> Option<&str> {
    let envelope: Envelope = serde_json::from_str(body).ok()?;
    envelope.response.get().strip_prefix('"')?.strip_suffix('"')
}

/// Text between the first `"response":"` and the last `","done"`
fn marker_segment(body: &str) -> Option<&str> {
    let start = body.find(RESPONSE_MARKER)? + RESPONSE_MARKER.len();
    let end = body.rfind(DONE_MARKER)?;
    (end >= start).then(|| &body[start..end])
}

/// Decode `\n`, `\r`, `\t`, `\"`, `\\`, `\u003c` and `\u003e` in one pass.
///
/// Every other backslash sequence is copied through unchanged.
pub fn unescape_subset(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut rest = segment;

    while let Some(pos) = rest.find('\\') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        let (decoded, consumed) = match tail.as_bytes().get(1) {
            Some(b'n') => ("\n", 2),
            Some(b'r') => ("\r", 2),
            Some(b't') => ("\t", 2),
            Some(b'"') => ("\"", 2),
            Some(b'\\') => ("\\", 2),
            Some(b'u') if tail.starts_with("\\u003c") => ("<", 6),
            Some(b'u') if tail.starts_with("\\u003e") => (">", 6),
            _ => ("\\", 1),
        };
        out.push_str(decoded);
        rest = &tail[consumed..];
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_newline_escape() {
        let body = r#"{"response":"line1\nline2","done":true}"#;
        assert_eq!(extract_response_text(body), "line1\nline2");
    }

    #[test]
    fn test_missing_done_returns_raw() {
        let body = r#"{"response":"partial"}"#;
        assert_eq!(extract_response_text(body), body);
    }

    #[test]
    fn test_only_two_unicode_escapes_decode() {
        let body = r#"{"response":"\u003cscript\u003e \u0026 \u003C","done":true}"#;
        assert_eq!(extract_response_text(body), r"<script> \u0026 \u003C");
    }

    #[test]
    fn test_escape_subset() {
        assert_eq!(unescape_subset(r#"a\tb\rc\"d\\e"#), "a\tb\rc\"d\\e");
        assert_eq!(unescape_subset(r"path\/x"), r"path\/x");
        assert_eq!(unescape_subset(r"trailing\"), r"trailing\");
    }

    #[test]
    fn test_escaped_backslash_is_not_reinterpreted() {
        // `\\n` is a backslash followed by `n`, not a newline
        assert_eq!(unescape_subset(r"C:\\new"), r"C:\new");
        assert_eq!(unescape_subset(r"\\u003c"), r"\u003c");
    }

    #[test]
    fn test_done_marker_inside_text_survives_structured_decode() {
        let body = r#"{"model":"m","response":"say \",\"done\" twice","done":true,"eval_count":9}"#;
        assert_eq!(extract_response_text(body), r#"say ","done" twice"#);
    }

    #[test]
    fn test_field_order_does_not_matter() {
        let body = r#"{"done":true,"response":"ok","model":"m"}"#;
        assert_eq!(extract_response_text(body), "ok");
    }

    #[test]
    fn test_marker_fallback_for_malformed_json() {
        // Trailing garbage breaks the structured decode
        let body = r#"{"response":"fallback\nworks","done":true} trailing"#;
        assert_eq!(extract_response_text(body), "fallback\nworks");
    }

    #[test]
    fn test_non_string_response_returns_raw() {
        let body = r#"{"response":42,"done":true}"#;
        assert_eq!(extract_response_text(body), body);
    }

    #[test]
    fn test_unicode_passes_through() {
        let body = r#"{"response":"héllo ✓","done":true}"#;
        assert_eq!(extract_response_text(body), "héllo ✓");
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(extract_response_text(""), "");
    }
}
