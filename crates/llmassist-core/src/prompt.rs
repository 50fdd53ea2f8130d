//! Prompt templates for the three workflows.

use crate::context::LoadedContext;
use crate::error::AssistError;

const CHAT_INSTRUCTIONS: &str = "SYSTEM INSTRUCTIONS:\n\
You are an AI Logic Router. Output ONLY the response.\n\
LOGIC:\n\
1. IF input is 'stop', 'hello', 'just testing' -> Reply normally. No code.\n\
2. IF input asks for analysis/attacks -> Act as Red Team Hacker. Provide Python PoCs.\n\
*** RULE ***: Do NOT print 'CASE A'. Just print the reply.\n\n";

const ANALYSIS_INSTRUCTIONS: &str = "SYSTEM INSTRUCTIONS:\n\
You are a senior web application penetration tester reviewing one captured HTTP exchange.\n\
Answer ONLY with an HTML fragment (no <html> or <body> tags, no markdown) using this structure:\n\
<h3>Summary</h3> one paragraph describing what the endpoint does.\n\
<h3>Findings</h3> a <ul> where each <li> starts with <b>[SEVERITY]</b> (Critical, High, Medium, Low or Info), \
names the issue and cites the exact header, parameter or body value involved.\n\
<h3>Attack Ideas</h3> an <ol> of concrete next tests, with payloads wrapped in <code>.\n\
Redacted values such as [REDACTED_TOKEN] are intentional; do not report them as findings.\n\
If nothing is wrong, say so in the Findings section instead of inventing issues.\n\n";

const REPORT_INSTRUCTIONS: &str = "SYSTEM INSTRUCTIONS:\n\
You are writing a vulnerability report draft for a client from one captured HTTP exchange.\n\
Answer ONLY with an HTML fragment (no <html> or <body> tags, no markdown) using this structure:\n\
<h2>Title</h2> a one-line vulnerability title.\n\
<h3>Severity</h3> a rating (Critical, High, Medium, Low or Info) with a one-sentence justification.\n\
<h3>Description</h3> what is wrong and where.\n\
<h3>Steps to Reproduce</h3> an <ol> of steps, quoting the request in <pre>.\n\
<h3>Impact</h3> business impact in plain language.\n\
<h3>Remediation</h3> a <ul> of specific fixes.\n\
Redacted values such as [REDACTED_TOKEN] are intentional; keep them redacted in the report.\n\n";

const ANALYSIS_DIRECTIVE: &str = "Analyze the following HTTP exchange for security weaknesses.";
const REPORT_DIRECTIVE: &str = "Draft a vulnerability report for the most significant issue in the following HTTP exchange.";

/// Which template a call uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    /// Freeform question about the loaded request
    Chat,
    /// Structured HTML security analysis of the request and response
    Analysis,
    /// Structured HTML report draft
    Report,
}

impl Workflow {
    pub fn as_str(&self) -> &'static str {
        match self {
            Workflow::Chat => "chat",
            Workflow::Analysis => "analysis",
            Workflow::Report => "report",
        }
    }

    /// Whether the workflow refuses to run without a loaded context
    pub fn requires_context(&self) -> bool {
        !matches!(self, Workflow::Chat)
    }

    fn instructions(&self) -> &'static str {
        match self {
            Workflow::Chat => CHAT_INSTRUCTIONS,
            Workflow::Analysis => ANALYSIS_INSTRUCTIONS,
            Workflow::Report => REPORT_INSTRUCTIONS,
        }
    }
}

/// Build the prompt for one call.
///
/// Chat uses `question` and the truncated request snippet (empty when
/// nothing is loaded). Analysis and report ignore `question`, use the
/// full context document, and return [`AssistError::NoContext`] when no
/// context is loaded.
pub fn assemble_prompt(
    workflow: Workflow,
    question: Option<&str>,
    context: Option<&LoadedContext>,
) -> Result<String, AssistError> {
    if workflow.requires_context() && context.is_none() {
        return Err(AssistError::NoContext);
    }

    let mut prompt = String::from(workflow.instructions());
    match workflow {
        Workflow::Chat => {
            prompt.push_str("USER INPUT:\n");
            prompt.push_str(question.unwrap_or_default());
            prompt.push_str("\n\nREQUEST DATA:\n");
            if let Some(context) = context {
                prompt.push_str(&context.chat_request);
            }
        }
        Workflow::Analysis | Workflow::Report => {
            let directive = if workflow == Workflow::Analysis {
                ANALYSIS_DIRECTIVE
            } else {
                REPORT_DIRECTIVE
            };
            prompt.push_str("TASK:\n");
            prompt.push_str(directive);
            prompt.push_str("\n\nCONTEXT:\n");
            if let Some(context) = context {
                prompt.push_str(&context.document);
            }
        }
    }
    Ok(prompt)
}
