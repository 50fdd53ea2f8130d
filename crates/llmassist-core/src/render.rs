//! Transcript rendering for a fixed, five-token markdown-like subset.
//!
//! Rendering is an ordered pipeline of pure passes:
//!
//! 1. [`escape_html`]
//! 2. [`style_labels`]
//! 3. [`stash_fenced_blocks`]
//! 4. [`inline_code`]
//! 5. [`bold`]
//! 6. [`line_breaks`]
//! 7. [`CodeStash::restore`]
//!
//! Fenced blocks are pulled out before the inline passes run and put back
//! last, so backticks and asterisks inside them stay literal.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

const USER_COLOR: &str = "#007bff";
const ASSISTANT_COLOR: &str = "#28a745";
const SYSTEM_COLOR: &str = "#dc3545";

const CODE_BLOCK_STYLE: &str = "background-color:#2b2b2b; color:#f8f8f2; padding:10px; border-radius:4px; font-family:monospace; margin:5px 0; white-space: pre-wrap;";
const INLINE_CODE_STYLE: &str = "background-color:#e0e0e0; color:#000000; font-family:monospace; padding: 3px; border-radius:3px;";
const BODY_STYLE: &str = "font-family:Segoe UI, sans-serif; font-size:12px;";
const REPORT_CSP: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src data:";

// Private-use character marking a stashed block; stripped from input by escape_html.
const STASH_SENTINEL: char = '\u{E000}';

static LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(YOU|AI|SYSTEM):").expect("valid label pattern"));

// Optional language tag must end its line, so "```ls -la```" keeps "ls".
static FENCED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```(?:[\w+-]*[ \t]*\r?\n)?(.*?)```").expect("valid fence pattern"));

static INLINE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]*)`").expect("valid inline pattern"));

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold pattern"));

static STASH_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("{0}([0-9]+){0}", STASH_SENTINEL)).expect("valid stash pattern")
});

/// Render transcript text to an HTML fragment
pub fn render_fragment(text: &str) -> String {
    let text = escape_html(text);
    let text = style_labels(&text);
    let (text, stash) = stash_fenced_blocks(&text);
    let text = inline_code(&text);
    let text = bold(&text);
    let text = line_breaks(&text);
    stash.restore(&text)
}

/// Render transcript text to a complete HTML document
pub fn render_document(text: &str) -> String {
    format!(
        "<html><body style='{}'>{}</body></html>",
        BODY_STYLE,
        render_fragment(text)
    )
}

/// Wrap a model-written HTML fragment (analysis or report) in a standalone document.
///
/// The fragment is inserted unescaped. Its content security policy blocks
/// scripts and remote loads. A surrounding ```` ```html ```` fence is dropped.
pub fn report_document(fragment: &str) -> String {
    format!(
        "<html><head><meta charset='utf-8'><meta http-equiv='Content-Security-Policy' content=\"{}\"></head><body style='{}'>{}</body></html>",
        REPORT_CSP,
        BODY_STYLE,
        unfence(fragment.trim())
    )
}

fn unfence(text: &str) -> &str {
    let Some(inner) = text.strip_prefix("```").and_then(|t| t.strip_suffix("```")) else {
        return text;
    };
    match inner.split_once('\n') {
        Some((tag, body)) if !tag.trim().contains(char::is_whitespace) => body.trim(),
        _ => inner.trim(),
    }
}

/// Escape `&`, `<` and `>`
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            STASH_SENTINEL => out.push(char::REPLACEMENT_CHARACTER),
            _ => out.push(c),
        }
    }
    out
}

/// Turn `YOU:`, `AI:` and `SYSTEM:` at line start into coloured bold labels
pub fn style_labels(text: &str) -> String {
    LABEL
        .replace_all(text, |caps: &Captures| {
            let label = &caps[1];
            let color = match label {
                "YOU" => USER_COLOR,
                "AI" => ASSISTANT_COLOR,
                _ => SYSTEM_COLOR,
            };
            format!("<br><b><span style='color:{}'>{}:</span></b>", color, label)
        })
        .into_owned()
}

/// Rendered fenced blocks, keyed by their position in the text
#[derive(Debug, Default)]
pub struct CodeStash {
    blocks: Vec<String>,
}

impl CodeStash {
    /// Put every stashed block back in place of its marker
    pub fn restore(&self, text: &str) -> String {
        STASH_REF
            .replace_all(text, |caps: &Captures| {
                caps[1]
                    .parse::<usize>()
                    .ok()
                    .and_then(|idx| self.blocks.get(idx))
                    .cloned()
                    .unwrap_or_default()
            })
            .into_owned()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Render each fenced block and replace it with a stash marker.
///
/// Matching is non-greedy across lines: a fence closes at the next
/// triple backtick. Block content is kept verbatim.
pub fn stash_fenced_blocks(text: &str) -> (String, CodeStash) {
    let mut stash = CodeStash::default();
    let replaced = FENCED
        .replace_all(text, |caps: &Captures| {
            let idx = stash.blocks.len();
            stash
                .blocks
                .push(format!("<div style='{}'>{}</div>", CODE_BLOCK_STYLE, &caps[1]));
            format!("{0}{1}{0}", STASH_SENTINEL, idx)
        })
        .into_owned();
    (replaced, stash)
}

/// Single-backtick spans
pub fn inline_code(text: &str) -> String {
    INLINE
        .replace_all(text, format!("<span style='{}'>$1</span>", INLINE_CODE_STYLE).as_str())
        .into_owned()
}

/// `**bold**` on a single line
pub fn bold(text: &str) -> String {
    BOLD.replace_all(text, "<b>$1</b>").into_owned()
}

pub fn line_breaks(text: &str) -> String {
    text.replace('\n', "<br>")
}
