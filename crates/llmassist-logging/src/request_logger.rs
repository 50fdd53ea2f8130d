use colored::Colorize;

use llmassist_core::{GenerateRequest, GenerateResponse};
use crate::safe_truncate;

const MAX_DEBUG_CHARS: usize = 5000;

/// Log an outgoing generate request (console output, verbose only)
pub fn log_request(url: &str, request: &GenerateRequest, verbose: bool) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_cyan());
    println!("{}", "🔍 INFERENCE REQUEST".bright_cyan().bold());
    println!("{}", "═".repeat(80).bright_cyan());

    // Parse URL to show host and port
    if let Ok(parsed_url) = reqwest::Url::parse(url) {
        println!("{}: {}", "URL".bright_yellow(), url);
        println!("{}: {}", "Host".bright_yellow(), parsed_url.host_str().unwrap_or("unknown"));
        println!(
            "{}: {}",
            "Port".bright_yellow(),
            parsed_url
                .port_or_known_default()
                .map(|p| p.to_string())
                .unwrap_or_else(|| "unknown".to_string())
        );
    } else {
        println!("{}: {}", "URL".bright_yellow(), url);
    }

    println!("{}: {}", "Model".bright_yellow(), request.model);
    println!(
        "{}: {} chars",
        "Prompt".bright_yellow(),
        request.prompt.chars().count()
    );

    println!("\n{}", "Request Body:".bright_yellow());
    match serde_json::to_string_pretty(&request) {
        Ok(json) => print_bounded(&json),
        Err(e) => println!("{}", format!("Error serializing request: {}", e).red()),
    }

    println!("{}", "═".repeat(80).bright_cyan());
    println!();
}

/// Log the server's answer (console output, verbose only)
pub fn log_response(
    status: &reqwest::StatusCode,
    headers: &reqwest::header::HeaderMap,
    body: &str,
    verbose: bool,
) {
    if !verbose {
        return;
    }

    println!("\n{}", "═".repeat(80).bright_green());
    println!("{}", "📥 INFERENCE RESPONSE".bright_green().bold());
    println!("{}", "═".repeat(80).bright_green());

    println!(
        "{}: {} {}",
        "Status".bright_yellow(),
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    );

    println!("\n{}", "Headers:".bright_yellow());
    for (name, value) in headers.iter() {
        if let Ok(val_str) = value.to_str() {
            println!("  {}: {}", name.as_str().bright_white(), val_str);
        }
    }

    println!("\n{}", "Response Body:".bright_yellow());
    // Pretty-print JSON, fall back to raw text
    match serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
    {
        Some(pretty) => print_bounded(&pretty),
        None => print_bounded(body),
    }

    if let Some(summary) = generation_summary(body) {
        println!("\n{}: {}", "Generation".bright_yellow(), summary);
    }

    println!("{}", "═".repeat(80).bright_green());
    println!();
}

/// Log a failed call that never produced a response (verbose only)
pub fn log_transport_error(url: &str, error: &str, verbose: bool) {
    if !verbose {
        return;
    }
    eprintln!("{} {} {}", "❌".bright_red(), format!("POST {} failed:", url).red(), error);
}

/// One-line model/token/timing summary of a generate response body
fn generation_summary(body: &str) -> Option<String> {
    let decoded: GenerateResponse = serde_json::from_str(body).ok()?;
    let mut parts = Vec::new();
    if let Some(model) = &decoded.model {
        parts.push(format!("model {}", model));
    }
    if let Some(count) = decoded.eval_count {
        parts.push(format!("{} tokens", count));
    }
    if let Some(nanos) = decoded.total_duration {
        parts.push(format!("{:.2}s total", nanos as f64 / 1e9));
    }
    if let Some(rate) = decoded.tokens_per_second() {
        parts.push(format!("{:.1} tok/s", rate));
    }
    if !decoded.done {
        parts.push("not done".to_string());
    }
    (!parts.is_empty()).then(|| parts.join(" • "))
}

fn print_bounded(text: &str) {
    if text.chars().count() > MAX_DEBUG_CHARS {
        println!("{}", safe_truncate(text, MAX_DEBUG_CHARS));
        println!(
            "\n{}",
            format!("... (truncated, total {} bytes)", text.len()).bright_black()
        );
    } else {
        println!("{}", text);
    }
}
