#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::Mutex;

use llmassist_core::{AssistError, AssistantConfig};
use llmassist_llm_api::{HealthStatus, InferenceClient};

/// Prompts containing this never complete, so the call can be superseded
pub const HANG_MARKER: &str = "HANG";

/// Analysis and report prompts carry this; they get an HTML answer
pub const REPORT_TASK_MARKER: &str = "TASK:\n";

/// In-process inference client that answers with a numbered reply
/// (wrapped in HTML for analysis and report prompts)
/// and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedClient {
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for ScriptedClient {
    async fn generate(&self, prompt: &str) -> Result<String, AssistError> {
        let n = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };
        if prompt.contains(HANG_MARKER) {
            std::future::pending::<()>().await;
        }
        if prompt.contains(REPORT_TASK_MARKER) {
            return Ok(format!("<h3>Finding</h3><p>answer #{}</p>", n));
        }
        Ok(format!("answer #{}", n))
    }

    async fn health_check(&self) -> HealthStatus {
        HealthStatus::unreachable("scripted client has no server")
    }

    fn model(&self) -> &str {
        "scripted"
    }

    fn endpoint(&self) -> &str {
        "http://scripted.invalid/api/generate"
    }
}

pub fn test_config() -> AssistantConfig {
    AssistantConfig::default()
}

pub const LOGIN_REQUEST: &str = "POST /login HTTP/1.1\r\n\
Host: api.test\r\n\
Authorization: Bearer xyz\r\n\
Cookie: session=abc123\r\n\
Content-Type: application/x-www-form-urlencoded\r\n\
\r\n\
user=admin&pass=hunter2";

pub const LOGIN_RESPONSE: &str = "HTTP/1.1 302 Found\r\nSet-Cookie: session=new\r\nLocation: /home\r\n\r\n";
