use anyhow::Result;
use clap::Parser;

use llmassist::app::{
    print_completions, run_check, run_oneshot, run_render, run_repl_mode, run_sanitize,
    run_web_server, setup_from_cli,
};
use llmassist::{Cli, Commands};
use llmassist_core::Workflow;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();
    let command = cli.command.clone().unwrap_or_default();

    // Commands that never talk to the inference server
    match &command {
        Commands::Sanitize { file } => return run_sanitize(file),
        Commands::Render { file, document } => return run_render(file, *document),
        Commands::Completions { shell } => {
            print_completions(*shell);
            return Ok(());
        }
        _ => {}
    }

    let app = setup_from_cli(&cli)?;

    match command {
        Commands::Ask { exchange, question } => {
            let question = question.join(" ");
            run_oneshot(&app, &exchange, Workflow::Chat, Some(&question), None).await
        }
        Commands::Analyze { exchange, html_out } => {
            run_oneshot(&app, &exchange, Workflow::Analysis, None, html_out.as_deref()).await
        }
        Commands::Report { exchange, html_out } => {
            run_oneshot(&app, &exchange, Workflow::Report, None, html_out.as_deref()).await
        }
        Commands::Panel { request, response, html_out } => {
            run_repl_mode(&app, request, response, html_out).await
        }
        Commands::Web { bind, port } => run_web_server(&app, &bind, port).await,
        Commands::Check => run_check(&app).await,
        Commands::Sanitize { .. } | Commands::Render { .. } | Commands::Completions { .. } => Ok(()),
    }
}
