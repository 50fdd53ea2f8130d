use serde_json::json;
use wiremock::matchers::*;
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock inference server for client tests
pub struct OllamaMockServer {
    server: MockServer,
}

impl OllamaMockServer {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.server.uri())
    }

    /// Expect exactly one generate call with this model and prompt, answer with `response_text`
    pub async fn mock_generate_success(&self, model: &str, prompt: &str, response_text: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "model": model,
                "prompt": prompt,
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "model": model,
                "created_at": "2024-05-01T12:00:00Z",
                "response": response_text,
                "done": true,
                "total_duration": 1_000_000u64,
                "eval_count": 12
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Expect one generate call whose body is exactly `raw_body`, byte for byte
    pub async fn mock_generate_exact_bytes(&self, raw_body: &str, response_text: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .and(body_string(raw_body))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "response": response_text,
                "done": true
            })))
            .expect(1)
            .mount(&self.server)
            .await;
    }

    /// Answer any generate call with a raw body
    pub async fn mock_generate_raw(&self, status: u16, body: &str) {
        Mock::given(method("POST"))
            .and(path("/api/generate"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_tags(&self, models: &[&str]) {
        let models: Vec<_> = models.iter().map(|name| json!({ "name": name })).collect();
        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "models": models })))
            .mount(&self.server)
            .await;
    }
}

/// An address nothing listens on
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/generate", port)
}
