use anyhow::{Context, Result};
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc as std_mpsc;
use std::thread;
use tokio::sync::mpsc;

use llmassist_core::{Speaker, TranscriptEntry, Workflow};

use crate::app::setup::{read_exchange, AppConfig};
use crate::panel::{Panel, PanelUpdate, Report};

const HELP: &str = "\
Commands:
  <question>                      ask about the loaded request
  /load <request> [response]      load a captured exchange from files
  /analyze                        security analysis of the loaded exchange
  /report                         draft a bug bounty report
  /clear                          clear the transcript (keeps the request)
  /html <file>                    write the rendered transcript to a file
  /export <file>                  write the latest analysis or report as an HTML page
  /status                         show model, endpoint and loaded target
  /help                           show this help
  exit | quit                     leave";

enum InputEvent {
    Line(String),
    Interrupted,
    Eof,
    Failed(String),
}

enum Flow {
    Continue,
    Exit,
}

/// Run the interactive terminal panel
pub async fn run_repl_mode(
    app: &AppConfig,
    request: Option<PathBuf>,
    response: Option<PathBuf>,
    html_out: Option<PathBuf>,
) -> Result<()> {
    let (panel, mut completions) = Panel::new(app.assistant.clone(), app.client());
    let mut panel = panel.with_logger(app.logger().await);

    println!("{}", "🔎 llmassist - local LLM assistant for captured requests".bright_cyan().bold());
    println!(
        "{}",
        format!("Model: {} • Endpoint: {}", panel.client().model(), panel.client().endpoint()).bright_black()
    );
    println!("{}", "Type '/help' for commands, 'exit' or 'quit' to leave\n".bright_black());

    panel.greet();
    if let Some(request) = request {
        match read_exchange(&request, response.as_deref()) {
            Ok(exchange) => {
                panel.load(&exchange);
            }
            Err(e) => eprintln!("{} {:#}", "❌".red(), e),
        }
    }
    flush(&mut panel, html_out.as_deref()).await;

    let (mut input, resume) = spawn_reader();

    loop {
        tokio::select! {
            Some(event) = input.recv() => match event {
                InputEvent::Line(line) => {
                    let flow = handle_line(&mut panel, line.trim()).await;
                    flush(&mut panel, html_out.as_deref()).await;
                    if let Flow::Exit = flow {
                        break;
                    }
                    let _ = resume.send(());
                }
                InputEvent::Interrupted => {
                    println!("{}", "^C - Use 'exit' or 'quit' to leave".bright_yellow());
                    let _ = resume.send(());
                }
                InputEvent::Eof => break,
                InputEvent::Failed(e) => {
                    eprintln!("{} Input error: {}", "❌".red(), e);
                    break;
                }
            },
            Some(completion) = completions.recv() => {
                if panel.apply(completion) {
                    flush(&mut panel, html_out.as_deref()).await;
                    // The answer printed over the reader's prompt
                    print!("{}", prompt());
                    let _ = io::stdout().flush();
                }
            }
            else => break,
        }
    }

    panel.shutdown().await;
    println!("{}", "Goodbye!".bright_cyan());
    Ok(())
}

/// Read lines on a plain thread so a pending call never blocks input.
///
/// The reader waits for a resume signal after each line, so the prompt is
/// redrawn once the foreground has handled the line. Starting a call only
/// spawns it, so the prompt comes back while the answer is still pending;
/// the completion arm reprints it after the answer. Dropping the resume
/// sender stops the thread before it re-enters raw mode.
fn spawn_reader() -> (mpsc::UnboundedReceiver<InputEvent>, std_mpsc::Sender<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let (resume_tx, resume_rx) = std_mpsc::channel::<()>();

    thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                let _ = tx.send(InputEvent::Failed(e.to_string()));
                return;
            }
        };
        let prompt_text = prompt();

        loop {
            let event = match rl.readline(&prompt_text) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = rl.add_history_entry(line.as_str());
                    }
                    InputEvent::Line(line)
                }
                Err(ReadlineError::Interrupted) => InputEvent::Interrupted,
                Err(ReadlineError::Eof) => InputEvent::Eof,
                Err(e) => InputEvent::Failed(e.to_string()),
            };
            let last = matches!(event, InputEvent::Eof | InputEvent::Failed(_));
            if tx.send(event).is_err() || last || resume_rx.recv().is_err() {
                break;
            }
        }
    });

    (rx, resume_tx)
}

async fn handle_line(panel: &mut Panel, line: &str) -> Flow {
    if line.is_empty() {
        return Flow::Continue;
    }
    if line == "exit" || line == "quit" {
        return Flow::Exit;
    }

    let (command, args) = match line.split_once(char::is_whitespace) {
        Some((command, args)) => (command, args.trim()),
        None => (line, ""),
    };

    match command {
        "/help" => println!("{}", HELP.bright_black()),
        "/load" => load_command(panel, args),
        "/analyze" => {
            if let Err(e) = panel.analyze() {
                notice(&e.to_string());
            }
        }
        "/report" => {
            if let Err(e) = panel.report() {
                notice(&e.to_string());
            }
        }
        "/clear" => panel.clear(),
        "/html" => {
            if args.is_empty() {
                notice("Usage: /html <file>");
            } else if let Err(e) = write_html(panel, Path::new(args)).await {
                eprintln!("{} {:#}", "❌".red(), e);
            } else {
                println!("{}", format!("📄 Transcript written to {}", args).bright_black());
            }
        }
        "/export" => {
            if args.is_empty() {
                notice("Usage: /export <file>");
            } else {
                match panel.last_report() {
                    None => notice("No analysis or report yet (try /analyze or /report)"),
                    Some(report) => match write_report(report, Path::new(args)).await {
                        Ok(()) => println!(
                            "{}",
                            format!("📄 {} written to {}", report_title(report), args).bright_black()
                        ),
                        Err(e) => eprintln!("{} {:#}", "❌".red(), e),
                    },
                }
            }
        }
        "/status" => print_status(panel),
        _ if command.starts_with('/') => notice(&format!("Unknown command: {} (try /help)", command)),
        _ => {
            if let Err(e) = panel.ask(line) {
                notice(&e.to_string());
            }
        }
    }
    Flow::Continue
}

fn load_command(panel: &mut Panel, args: &str) {
    let mut parts = args.split_whitespace();
    let Some(request) = parts.next() else {
        notice("Usage: /load <request-file> [response-file]");
        return;
    };
    let response = parts.next().map(Path::new);

    match read_exchange(Path::new(request), response) {
        Ok(exchange) => {
            panel.load(&exchange);
        }
        Err(e) => eprintln!("{} {:#}", "❌".red(), e),
    }
}

fn print_status(panel: &Panel) {
    let client = panel.client();
    println!("{}", "📊 Status".bright_cyan().bold());
    println!("   Model:    {}", client.model());
    println!("   Endpoint: {}", client.endpoint());
    match panel.context() {
        Some(context) => println!("   Target:   {}", context.target),
        None => println!("   Target:   {}", "none loaded".bright_black()),
    }
    match panel.pending_workflow() {
        Some(workflow) => println!("   Pending:  {}", workflow.as_str().yellow()),
        None => println!("   Pending:  {}", "idle".bright_black()),
    }
    println!("   Entries:  {}", panel.transcript().len());
}

async fn write_html(panel: &Panel, path: &Path) -> Result<()> {
    tokio::fs::write(path, panel.render_html())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

async fn write_report(report: &Report, path: &Path) -> Result<()> {
    tokio::fs::write(path, report.document())
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn report_title(report: &Report) -> &'static str {
    match report.workflow {
        Workflow::Report => "Report",
        _ => "Analysis",
    }
}

fn prompt() -> String {
    format!("{} ", "YOU>".bright_blue().bold())
}

/// Print what changed and refresh the HTML snapshot
async fn flush(panel: &mut Panel, html_out: Option<&Path>) {
    let updates = panel.sync().await;
    if updates.is_empty() {
        return;
    }

    for update in &updates {
        match *update {
            PanelUpdate::Cleared => println!("{}", "─".repeat(60).bright_black()),
            PanelUpdate::Entry { index, .. } => {
                if let Some(entry) = panel.transcript().get(index) {
                    print_entry(entry);
                }
            }
        }
    }

    if let Some(path) = html_out {
        if let Err(e) = write_html(panel, path).await {
            eprintln!("{} {:#}", "❌".red(), e);
        }
    }
}

fn print_entry(entry: &TranscriptEntry) {
    let label = entry.speaker.label();
    match entry.speaker {
        // The user just typed it
        Speaker::User => {}
        Speaker::System => println!("{} {}", format!("{}:", label).red().bold(), entry.message),
        Speaker::Assistant if entry.is_placeholder() => {
            println!("{} {}", format!("{}:", label).green().bold(), entry.message.bright_black())
        }
        Speaker::Assistant => println!("\n{} {}\n", format!("{}:", label).green().bold(), entry.message),
    }
}

fn notice(message: &str) {
    println!("{} {}", "⚠️".yellow(), message.yellow());
}
