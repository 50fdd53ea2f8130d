use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};

use llmassist_core::{render_fragment, AssistError, HttpExchange, TranscriptEntry};

use crate::panel::{CallId, Completion, Panel, Report};

const INDEX_HTML: &str = include_str!("../../web/index.html");

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub panel: Arc<Mutex<Panel>>,
}

impl AppState {
    /// Share `panel` and start the task that applies its completions
    pub fn spawn(panel: Panel, mut completions: mpsc::UnboundedReceiver<Completion>) -> Self {
        let panel = Arc::new(Mutex::new(panel));
        let pump = Arc::clone(&panel);
        tokio::spawn(async move {
            while let Some(completion) = completions.recv().await {
                let mut panel = pump.lock().await;
                if panel.apply(completion) {
                    panel.sync().await;
                }
            }
        });
        Self { panel }
    }
}

/// Snapshot of the panel returned by every route
#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptView {
    pub entries: Vec<TranscriptEntry>,
    /// Rendered transcript, ready to drop into a container element
    pub html: String,
    pub target: Option<String>,
    pub pending_call: Option<CallId>,
    pub model: String,
    /// Latest analysis or report as a standalone page, for a sandboxed frame
    pub report_html: Option<String>,
    pub report_kind: Option<String>,
}

impl TranscriptView {
    fn of(panel: &Panel) -> Self {
        let transcript = panel.transcript();
        Self {
            entries: transcript.entries().to_vec(),
            html: render_fragment(&transcript.to_text()),
            target: panel.context().map(|c| c.target.clone()),
            pending_call: panel.pending_call_id(),
            model: panel.client().model().to_string(),
            report_html: panel.last_report().map(Report::document),
            report_kind: panel.last_report().map(|r| r.workflow.as_str().to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct LoadRequest {
    pub request: String,
    #[serde(default)]
    pub response: Option<String>,
    /// Ask this right after loading, instead of waiting for input
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/transcript", get(get_transcript))
        .route("/api/load", post(load_exchange))
        .route("/api/ask", post(ask_question))
        .route("/api/analyze", post(run_analysis))
        .route("/api/report", post(run_report))
        .route("/api/clear", post(clear_transcript))
        .route("/api/health", get(health))
        .with_state(state)
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/transcript - Current transcript and call state
async fn get_transcript(State(state): State<AppState>) -> Json<TranscriptView> {
    let panel = state.panel.lock().await;
    Json(TranscriptView::of(&panel))
}

/// POST /api/load - Load a captured exchange, optionally asking about it
async fn load_exchange(
    State(state): State<AppState>,
    Json(payload): Json<LoadRequest>,
) -> Result<Json<TranscriptView>, AppError> {
    if payload.request.trim().is_empty() {
        return Err(AppError::BadRequest("Request text is empty".into()));
    }
    let exchange = HttpExchange::new(payload.request, payload.response);

    let mut panel = state.panel.lock().await;
    match payload.question.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
        Some(question) => {
            panel.load_and_ask(&exchange, question)?;
        }
        None => {
            panel.load(&exchange);
        }
    }
    panel.sync().await;
    Ok(Json(TranscriptView::of(&panel)))
}

/// POST /api/ask - Freeform question about the loaded exchange
async fn ask_question(
    State(state): State<AppState>,
    Json(payload): Json<AskRequest>,
) -> Result<Json<TranscriptView>, AppError> {
    let mut panel = state.panel.lock().await;
    if panel.ask(&payload.question)?.is_none() {
        return Err(AppError::BadRequest("Question is empty".into()));
    }
    panel.sync().await;
    Ok(Json(TranscriptView::of(&panel)))
}

/// POST /api/analyze - Structured security analysis
async fn run_analysis(State(state): State<AppState>) -> Result<Json<TranscriptView>, AppError> {
    let mut panel = state.panel.lock().await;
    panel.analyze()?;
    panel.sync().await;
    Ok(Json(TranscriptView::of(&panel)))
}

/// POST /api/report - Structured report draft
async fn run_report(State(state): State<AppState>) -> Result<Json<TranscriptView>, AppError> {
    let mut panel = state.panel.lock().await;
    panel.report()?;
    panel.sync().await;
    Ok(Json(TranscriptView::of(&panel)))
}

/// POST /api/clear - Clear the transcript, keeping the loaded exchange
async fn clear_transcript(State(state): State<AppState>) -> Json<TranscriptView> {
    let mut panel = state.panel.lock().await;
    panel.clear();
    panel.sync().await;
    Json(TranscriptView::of(&panel))
}

/// GET /api/health - Check the inference server
async fn health(State(state): State<AppState>) -> impl IntoResponse {
    // Don't hold the panel across the network call
    let client = state.panel.lock().await.client();
    let status = client.health_check().await;
    let code = if status.is_healthy() { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (code, Json(status))
}

/// Error type for route handlers
#[derive(Debug)]
pub enum AppError {
    Assist(AssistError),
    BadRequest(String),
}

impl From<AssistError> for AppError {
    fn from(err: AssistError) -> Self {
        AppError::Assist(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Assist(err @ AssistError::NoContext) => (StatusCode::CONFLICT, err.to_string()),
            AppError::Assist(err @ AssistError::Config(_)) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            AppError::Assist(err) => (StatusCode::BAD_GATEWAY, err.to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        }));

        (status, body).into_response()
    }
}
