use anyhow::{bail, Context, Result};
use clap::CommandFactory;
use clap_complete::Shell;
use colored::Colorize;
use std::io;
use std::path::Path;

use llmassist_core::{render_document, render_fragment, sanitize, Speaker, Workflow};

use crate::app::setup::{read_exchange, AppConfig};
use crate::cli::{Cli, ExchangeArgs};
use crate::panel::Panel;

/// Run a single workflow against one exchange and print the answer.
///
/// The answer goes to stdout; a failed call is an error exit.
pub async fn run_oneshot(
    app: &AppConfig,
    exchange_args: &ExchangeArgs,
    workflow: Workflow,
    question: Option<&str>,
    html_out: Option<&Path>,
) -> Result<()> {
    let exchange = read_exchange(&exchange_args.request, exchange_args.response.as_deref())?;

    let (panel, mut completions) = Panel::new(app.assistant.clone(), app.client());
    let mut panel = panel.with_logger(app.logger().await);

    let target = panel.load(&exchange);
    if app.verbose {
        println!("{}", format!("🎯 Target: {}", target).bright_black());
    }

    match workflow {
        Workflow::Chat => {
            panel.ask(question.unwrap_or_default())?;
        }
        Workflow::Analysis => {
            panel.analyze()?;
        }
        Workflow::Report => {
            panel.report()?;
        }
    }
    if !panel.is_pending() {
        bail!("Nothing to ask: the question is empty");
    }

    eprintln!("{}", format!("⏳ Waiting for {}...", panel.client().model()).bright_black());
    while panel.is_pending() {
        let completion = completions
            .recv()
            .await
            .context("Inference task ended without a result")?;
        panel.apply(completion);
    }
    panel.sync().await;

    if let (Some(path), Some(report)) = (html_out, panel.last_report()) {
        tokio::fs::write(path, report.document())
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        eprintln!("{}", format!("📄 Report written to {}", path.display()).bright_black());
    }
    panel.shutdown().await;

    let last = panel
        .transcript()
        .entries()
        .last()
        .context("Transcript is empty")?;
    match last.speaker {
        Speaker::Assistant => {
            println!("{}", last.message);
            Ok(())
        }
        _ => bail!("{}", last.message),
    }
}

pub fn run_sanitize(file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    print!("{}", sanitize(&text));
    Ok(())
}

pub fn run_render(file: &Path, document: bool) -> Result<()> {
    let text = std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let html = if document { render_document(&text) } else { render_fragment(&text) };
    println!("{}", html);
    Ok(())
}

/// Check the inference server; fails when it is unreachable or lacks the model
pub async fn run_check(app: &AppConfig) -> Result<()> {
    let client = app.client();
    println!("🔍 Checking {} ...", client.endpoint());

    let status = client.health_check().await;
    if !status.reachable {
        println!("{} Server unreachable: {}", "❌".red(), status.error.unwrap_or_default());
        bail!("inference server unreachable");
    }

    let latency = status.latency_ms.map(|ms| format!(" ({} ms)", ms)).unwrap_or_default();
    println!("{} Server reachable{}", "✅".green(), latency);

    if let Some(error) = &status.error {
        println!("{} {}", "⚠️".yellow(), error);
    }
    match status.model_available {
        Some(true) => println!("{} Model '{}' is installed", "✅".green(), client.model()),
        Some(false) => {
            println!("{} Model '{}' is not installed", "❌".red(), client.model());
            if !status.models.is_empty() {
                println!("{}", format!("   Installed: {}", status.models.join(", ")).bright_black());
            }
        }
        None => println!("{} Could not determine installed models", "⚠️".yellow()),
    }

    if status.is_healthy() {
        Ok(())
    } else {
        bail!("model '{}' not available", client.model())
    }
}

pub fn print_completions(shell: Shell) {
    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "llmassist", &mut io::stdout());
}
