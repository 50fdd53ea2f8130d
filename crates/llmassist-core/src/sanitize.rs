//! Redaction of credential-bearing headers in raw HTTP text.

use once_cell::sync::Lazy;
use regex::Regex;

pub const REDACTED_TOKEN: &str = "[REDACTED_TOKEN]";
pub const REDACTED_COOKIE: &str = "[REDACTED_COOKIE]";
pub const REDACTED_API_KEY: &str = "[REDACTED_API_KEY]";

// Header values stop before `\r` so CRLF line endings survive.
static AUTHORIZATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(authorization:[ \t]*)(bearer[ \t]+)?[^\r\n]+").expect("valid authorization pattern")
});

static COOKIE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(cookie:[ \t]*)[^\r\n]+").expect("valid cookie pattern")
});

static API_KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^(x-api-key:[ \t]*)[^\r\n]+").expect("valid api key pattern")
});

/// Replace secret header values with fixed placeholders.
///
/// `Authorization` keeps an optional `Bearer ` prefix and loses only the
/// credential; `Cookie` and `X-API-Key` lose their whole value. Header
/// names keep their original case. Text without those headers comes back
/// unchanged.
pub fn sanitize(raw: &str) -> String {
    let text = AUTHORIZATION
        .replace_all(raw, format!("${{1}}${{2}}{}", REDACTED_TOKEN).as_str())
        .into_owned();
    let text = COOKIE
        .replace_all(&text, format!("${{1}}{}", REDACTED_COOKIE).as_str())
        .into_owned();
    API_KEY
        .replace_all(&text, format!("${{1}}{}", REDACTED_API_KEY).as_str())
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bearer_token_redacted() {
        let out = sanitize("GET / HTTP/1.1\nAuthorization: Bearer abc123\n");
        assert!(out.contains("Authorization: Bearer [REDACTED_TOKEN]"));
        assert!(!out.contains("abc123"));
    }

    #[test]
    fn test_basic_auth_fully_redacted() {
        let out = sanitize("Authorization: Basic dXNlcjpwYXNz\n");
        assert_eq!(out, "Authorization: [REDACTED_TOKEN]\n");
    }

    #[test]
    fn test_case_insensitive_names_keep_original_case() {
        let out = sanitize("authorization: bearer tok\nCOOKIE: a=b\nx-Api-KEY: k1\n");
        assert_eq!(
            out,
            "authorization: bearer [REDACTED_TOKEN]\nCOOKIE: [REDACTED_COOKIE]\nx-Api-KEY: [REDACTED_API_KEY]\n"
        );
    }

    #[test]
    fn test_cookie_full_value_redacted() {
        let out = sanitize("Cookie: session=s3cr3t; theme=dark\n");
        assert_eq!(out, "Cookie: [REDACTED_COOKIE]\n");
        assert!(!out.contains("s3cr3t"));
    }

    #[test]
    fn test_api_key_full_value_redacted() {
        let out = sanitize("X-API-Key: live_key_42\r\nAccept: */*\r\n");
        assert_eq!(out, "X-API-Key: [REDACTED_API_KEY]\r\nAccept: */*\r\n");
    }

    #[test]
    fn test_crlf_preserved() {
        let raw = "GET / HTTP/1.1\r\nAuthorization: Bearer xyz\r\nHost: a\r\n\r\n";
        assert_eq!(
            sanitize(raw),
            "GET / HTTP/1.1\r\nAuthorization: Bearer [REDACTED_TOKEN]\r\nHost: a\r\n\r\n"
        );
    }

    #[test]
    fn test_non_matching_lines_untouched() {
        let raw = "POST /login HTTP/1.1\nHost: example.com\nContent-Type: application/json\n\n{\"authorization\": 1}";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_only_line_start_headers_match() {
        // Set-Cookie is a different header and mid-line mentions are body text
        let raw = "Set-Cookie: id=1\nnote Cookie: x\n";
        assert_eq!(sanitize(raw), raw);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(sanitize(""), "");
    }
}
