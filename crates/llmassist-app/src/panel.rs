//! The panel controller: owner of the transcript and the loaded context.
//!
//! A `Panel` lives on one foreground task. Inference calls run on spawned
//! tasks and report back through the completion channel returned by
//! [`Panel::new`]; the foreground hands each [`Completion`] to
//! [`Panel::apply`]. Only one call is live at a time: starting a new one
//! aborts the previous task and marks its placeholder as superseded, and
//! completions carrying an older call id are dropped.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use llmassist_core::{
    assemble_prompt, report_document, AssistError, AssistantConfig, HttpExchange, LoadedContext,
    Speaker, Transcript, Workflow, SUPERSEDED_MESSAGE,
};
use llmassist_llm_api::InferenceClient;
use llmassist_logging::ConversationLogger;

pub type CallId = u64;

pub const READY_MESSAGE: &str = "Ready. Load a request with /load <request-file> [response-file] to begin.";
pub const LISTENING_MESSAGE: &str = "I am listening.";
pub const CLEARED_MESSAGE: &str = "Transcript cleared.";
pub const ANALYSIS_REQUEST: &str = "[Security analysis requested]";
pub const REPORT_REQUEST: &str = "[Report draft requested]";

/// Outcome of one inference call, sent back to the foreground task
#[derive(Debug)]
pub struct Completion {
    pub call_id: CallId,
    pub result: Result<String, AssistError>,
}

/// What changed in the transcript since the last [`Panel::sync`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelUpdate {
    /// Transcript was emptied; redraw from scratch
    Cleared,
    /// Entry at `index` was appended, or replaced in place when `replaced`
    Entry { index: usize, replaced: bool },
}

/// Latest analysis or report answer, kept as HTML next to the transcript
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub workflow: Workflow,
    /// Fragment exactly as the model wrote it
    pub fragment: String,
}

impl Report {
    /// Standalone document for a file or a sandboxed frame
    pub fn document(&self) -> String {
        report_document(&self.fragment)
    }
}

struct PendingCall {
    id: CallId,
    workflow: Workflow,
    handle: JoinHandle<()>,
}

pub struct Panel {
    config: AssistantConfig,
    client: Arc<dyn InferenceClient>,
    transcript: Transcript,
    context: Option<LoadedContext>,
    pending: Option<PendingCall>,
    next_call_id: CallId,
    completions: mpsc::UnboundedSender<Completion>,
    updates: Vec<PanelUpdate>,
    last_report: Option<Report>,
    logger: Option<ConversationLogger>,
}

impl Panel {
    /// Create a panel and the receiver its completions arrive on
    pub fn new(
        config: AssistantConfig,
        client: Arc<dyn InferenceClient>,
    ) -> (Self, mpsc::UnboundedReceiver<Completion>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let panel = Self {
            config,
            client,
            transcript: Transcript::new(),
            context: None,
            pending: None,
            next_call_id: 1,
            completions: tx,
            updates: Vec::new(),
            last_report: None,
            logger: None,
        };
        (panel, rx)
    }

    pub fn with_logger(mut self, logger: Option<ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Show the startup notice
    pub fn greet(&mut self) {
        self.push(Speaker::System, READY_MESSAGE);
    }

    /// Load a new exchange: drops any pending call and starts a fresh transcript.
    /// Returns the target summary shown to the user.
    pub fn load(&mut self, exchange: &HttpExchange) -> String {
        let target = self.load_context(exchange);
        self.push(Speaker::System, LISTENING_MESSAGE);
        target
    }

    /// Load a new exchange and immediately ask `question` about it
    pub fn load_and_ask(&mut self, exchange: &HttpExchange, question: &str) -> Result<Option<CallId>, AssistError> {
        self.load_context(exchange);
        self.ask(question)
    }

    /// Ask a freeform question. Blank questions are ignored.
    pub fn ask(&mut self, question: &str) -> Result<Option<CallId>, AssistError> {
        let question = question.trim();
        if question.is_empty() {
            return Ok(None);
        }
        self.start(Workflow::Chat, Some(question)).map(Some)
    }

    /// Structured HTML analysis of the loaded exchange
    pub fn analyze(&mut self) -> Result<CallId, AssistError> {
        self.start(Workflow::Analysis, None)
    }

    /// Structured HTML report draft for the loaded exchange
    pub fn report(&mut self) -> Result<CallId, AssistError> {
        self.start(Workflow::Report, None)
    }

    /// Empty the transcript and report, keeping the loaded context
    pub fn clear(&mut self) {
        self.abort_pending();
        self.last_report = None;
        self.reset_transcript();
        self.push(Speaker::System, CLEARED_MESSAGE);
    }

    /// Apply a completion; returns false when it belongs to a superseded call
    pub fn apply(&mut self, completion: Completion) -> bool {
        let workflow = match &self.pending {
            Some(pending) if pending.id == completion.call_id => pending.workflow,
            _ => return false,
        };
        self.pending = None;

        match completion.result {
            Ok(text) => {
                if workflow != Workflow::Chat {
                    self.last_report = Some(Report { workflow, fragment: text.clone() });
                }
                self.resolve_answer(text);
            }
            Err(e) => {
                self.push(Speaker::System, e.to_string());
            }
        }
        true
    }

    /// Drain pending updates, writing each touched entry to the conversation log
    pub async fn sync(&mut self) -> Vec<PanelUpdate> {
        let updates = std::mem::take(&mut self.updates);
        if let Some(logger) = &mut self.logger {
            let model = self.client.model();
            for update in &updates {
                if let PanelUpdate::Entry { index, replaced } = *update {
                    if let Some(entry) = self.transcript.get(index) {
                        logger.log(index, entry, Some(model), replaced).await;
                    }
                }
            }
        }
        updates
    }

    pub async fn shutdown(&mut self) {
        self.abort_pending();
        if let Some(logger) = &mut self.logger {
            logger.shutdown().await;
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn context(&self) -> Option<&LoadedContext> {
        self.context.as_ref()
    }

    pub fn config(&self) -> &AssistantConfig {
        &self.config
    }

    pub fn client(&self) -> Arc<dyn InferenceClient> {
        Arc::clone(&self.client)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_call_id(&self) -> Option<CallId> {
        self.pending.as_ref().map(|p| p.id)
    }

    pub fn pending_workflow(&self) -> Option<Workflow> {
        self.pending.as_ref().map(|p| p.workflow)
    }

    /// Latest successful analysis or report for the loaded exchange
    pub fn last_report(&self) -> Option<&Report> {
        self.last_report.as_ref()
    }

    pub fn render_html(&self) -> String {
        self.transcript.render_html()
    }

    fn start(&mut self, workflow: Workflow, question: Option<&str>) -> Result<CallId, AssistError> {
        // Build the prompt first so a missing context touches nothing
        let prompt = assemble_prompt(workflow, question, self.context.as_ref())?;

        self.supersede_pending();
        let user_line = match workflow {
            Workflow::Chat => question.unwrap_or_default(),
            Workflow::Analysis => ANALYSIS_REQUEST,
            Workflow::Report => REPORT_REQUEST,
        };
        self.push(Speaker::User, user_line);
        let index = self.transcript.push_placeholder();
        self.updates.push(PanelUpdate::Entry { index, replaced: false });

        let call_id = self.next_call_id;
        self.next_call_id += 1;

        let client = Arc::clone(&self.client);
        let tx = self.completions.clone();
        let handle = tokio::spawn(async move {
            let result = client.generate(&prompt).await;
            // Receiver gone means the panel shut down
            let _ = tx.send(Completion { call_id, result });
        });

        self.pending = Some(PendingCall { id: call_id, workflow, handle });
        Ok(call_id)
    }

    fn resolve_answer(&mut self, text: String) {
        match self.transcript.resolve_placeholder(text.clone()) {
            Some(index) => self.updates.push(PanelUpdate::Entry { index, replaced: true }),
            None => {
                self.push(Speaker::Assistant, text);
            }
        }
    }

    fn supersede_pending(&mut self) {
        if self.pending.is_some() {
            self.abort_pending();
            if let Some(index) = self.transcript.resolve_placeholder(SUPERSEDED_MESSAGE) {
                self.updates.push(PanelUpdate::Entry { index, replaced: true });
            }
        }
    }

    fn abort_pending(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.handle.abort();
        }
    }

    fn load_context(&mut self, exchange: &HttpExchange) -> String {
        self.abort_pending();
        let context = LoadedContext::from_exchange(exchange, &self.config);
        let target = context.target.clone();
        self.context = Some(context);
        self.last_report = None;
        self.reset_transcript();
        self.push(Speaker::System, format!("Target Request Loaded ({})", target));
        target
    }

    fn reset_transcript(&mut self) {
        self.transcript.clear();
        self.updates.clear();
        self.updates.push(PanelUpdate::Cleared);
    }

    fn push(&mut self, speaker: Speaker, message: impl Into<String>) -> usize {
        let index = self.transcript.push(speaker, message);
        self.updates.push(PanelUpdate::Entry { index, replaced: false });
        index
    }
}

impl Drop for Panel {
    fn drop(&mut self) {
        self.abort_pending();
    }
}
