mod common;

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::mpsc::UnboundedReceiver;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use llmassist::{Completion, Panel};
use llmassist_core::{HttpExchange, Speaker, Workflow, SUPERSEDED_MESSAGE};
use llmassist_llm_api::OllamaClient;
use llmassist_logging::ConversationLogger;

use common::{test_config, ScriptedClient, HANG_MARKER, LOGIN_REQUEST, LOGIN_RESPONSE};

async fn next_completion(rx: &mut UnboundedReceiver<Completion>) -> Completion {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("completion within 5s")
        .expect("channel open")
}

fn login_exchange() -> HttpExchange {
    HttpExchange::new(LOGIN_REQUEST, Some(LOGIN_RESPONSE.to_string()))
}

#[tokio::test]
async fn test_credentials_never_reach_model_or_transcript() {
    let client = Arc::new(ScriptedClient::new());
    let (mut panel, mut rx) = Panel::new(test_config(), client.clone());

    panel.load(&HttpExchange::new(
        "GET /me HTTP/1.1\nHost: api.test\nAuthorization: Bearer xyz\n",
        None,
    ));
    panel.ask("summarize").unwrap();
    assert!(panel.apply(next_completion(&mut rx).await));

    let prompts = client.prompts();
    assert_eq!(prompts.len(), 1);
    assert!(prompts[0].contains("USER INPUT:\nsummarize"));
    assert!(prompts[0].contains("Authorization: Bearer [REDACTED_TOKEN]"));
    assert!(!prompts[0].contains("xyz"));

    let text = panel.transcript().to_text();
    assert!(!text.contains("xyz"));
    assert!(text.ends_with("YOU: summarize\n\nAI: answer #1\n\n"));
    assert!(panel
        .render_html()
        .contains("<b><span style='color:#28a745'>AI:</span></b> answer #1"));
}

#[tokio::test]
async fn test_analysis_uses_full_context_document() {
    let client = Arc::new(ScriptedClient::new());
    let (mut panel, mut rx) = Panel::new(test_config(), client.clone());

    panel.load(&login_exchange());
    panel.analyze().unwrap();
    panel.apply(next_completion(&mut rx).await);

    let prompt = &client.prompts()[0];
    assert!(prompt.contains("=== HTTP REQUEST ===\nPOST /login HTTP/1.1"));
    assert!(prompt.contains("=== HTTP RESPONSE ===\nHTTP/1.1 302 Found"));
    assert!(prompt.contains("Cookie: [REDACTED_COOKIE]"));
    assert!(!prompt.contains("abc123"));
    // Set-Cookie is a response header, not a credential we send
    assert!(prompt.contains("Set-Cookie: session=new"));
}

#[tokio::test]
async fn test_analysis_answer_exported_as_report_page() {
    let client = Arc::new(ScriptedClient::new());
    let (mut panel, mut rx) = Panel::new(test_config(), client);

    panel.load(&login_exchange());
    panel.analyze().unwrap();
    panel.apply(next_completion(&mut rx).await);

    let report = panel.last_report().unwrap();
    assert_eq!(report.workflow, Workflow::Analysis);
    assert_eq!(report.fragment, "<h3>Finding</h3><p>answer #1</p>");
    let page = report.document();
    assert!(page.contains("<body"));
    assert!(page.contains("<h3>Finding</h3><p>answer #1</p>"));
    assert!(!page.contains("&lt;h3&gt;"));

    // A chat answer afterwards does not replace the report
    panel.ask("and now?").unwrap();
    panel.apply(next_completion(&mut rx).await);
    assert_eq!(panel.last_report().unwrap().fragment, "<h3>Finding</h3><p>answer #1</p>");
}

#[tokio::test]
async fn test_newer_call_supersedes_pending_one() {
    let client = Arc::new(ScriptedClient::new());
    let (mut panel, mut rx) = Panel::new(test_config(), client.clone());

    panel.load(&login_exchange());
    let first = panel.ask(&format!("{} forever", HANG_MARKER)).unwrap().unwrap();
    let second = panel.ask("quick one").unwrap().unwrap();

    let completion = next_completion(&mut rx).await;
    assert_eq!(completion.call_id, second);
    assert!(panel.apply(completion));
    assert!(!panel.is_pending());

    let entries = panel.transcript().entries();
    let assistant: Vec<&str> = entries
        .iter()
        .filter(|e| e.speaker == Speaker::Assistant)
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(assistant, vec![SUPERSEDED_MESSAGE, "answer #2"]);

    // The aborted call never reports back
    assert!(tokio::time::timeout(Duration::from_millis(100), rx.recv()).await.is_err());
    assert!(first < second);
}

#[tokio::test]
async fn test_server_error_shown_inline_through_real_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/generate"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let client = Arc::new(OllamaClient::new(format!("{}/api/generate", server.uri()), "llama3"));
    let (mut panel, mut rx) = Panel::new(test_config(), client);

    panel.load(&login_exchange());
    panel.report().unwrap();
    panel.apply(next_completion(&mut rx).await);

    let last = panel.transcript().entries().last().unwrap();
    assert_eq!(last.speaker, Speaker::System);
    assert_eq!(last.message, "Error 500");
    // Placeholder stays; the failure is appended after it
    assert_eq!(panel.transcript().len(), 5);
    assert!(!panel.is_pending());
}

#[tokio::test]
async fn test_conversation_log_replays_transcript() {
    let dir = TempDir::new().unwrap();
    let logger = ConversationLogger::new(dir.path()).await.unwrap();
    let log_path = logger.file_path().to_path_buf();

    let client = Arc::new(ScriptedClient::new());
    let (panel, mut rx) = Panel::new(test_config(), client);
    let mut panel = panel.with_logger(Some(logger));

    panel.load(&login_exchange());
    panel.ask("what is this?").unwrap();
    panel.sync().await;
    panel.apply(next_completion(&mut rx).await);
    panel.sync().await;
    panel.shutdown().await;

    let content = tokio::fs::read_to_string(&log_path).await.unwrap();
    let records: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(records.len(), 5);
    assert_eq!(records[3]["content"], "Thinking...");
    assert_eq!(records[4]["index"], 3);
    assert_eq!(records[4]["content"], "answer #1");
    assert_eq!(records[4]["replaced"], true);
    assert_eq!(records[4]["model"], "scripted");
    assert!(records[0].get("model").is_none());
}
