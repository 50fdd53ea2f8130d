use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// CLI arguments for llmassist
#[derive(Parser, Debug)]
#[command(name = "llmassist")]
#[command(about = "Ask a local language model about captured HTTP requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to config file (default: llmassist.toml in the working directory)
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Inference endpoint (e.g., http://localhost:11434/api/generate)
    #[arg(long, value_name = "URL", env = "LLMASSIST_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Model identifier sent with each request
    #[arg(long, value_name = "MODEL", env = "LLMASSIST_MODEL", global = true)]
    pub model: Option<String>,

    /// Maximum characters of captured response included in the context
    #[arg(long, value_name = "CHARS", global = true)]
    pub response_cap: Option<usize>,

    /// Maximum characters of request included in chat prompts
    #[arg(long, value_name = "CHARS", global = true)]
    pub request_cap: Option<usize>,

    /// Request timeout in seconds (default: none)
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Write a JSONL conversation log into this directory
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Enable verbose debug output (shows HTTP requests, responses, headers, etc.)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Captured exchange read from disk
#[derive(Args, Debug, Clone)]
pub struct ExchangeArgs {
    /// File holding the raw HTTP request
    #[arg(short = 'r', long, value_name = "FILE")]
    pub request: PathBuf,

    /// File holding the raw HTTP response
    #[arg(long, value_name = "FILE")]
    pub response: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Ask one question about a captured request and print the answer
    Ask {
        #[command(flatten)]
        exchange: ExchangeArgs,
        /// Question to ask
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// Security analysis of a captured exchange (HTML)
    Analyze {
        #[command(flatten)]
        exchange: ExchangeArgs,
        /// Also write the HTML answer as a standalone page
        #[arg(long, value_name = "FILE")]
        html_out: Option<PathBuf>,
    },
    /// Draft a bug bounty report for a captured exchange (HTML)
    Report {
        #[command(flatten)]
        exchange: ExchangeArgs,
        /// Also write the HTML answer as a standalone page
        #[arg(long, value_name = "FILE")]
        html_out: Option<PathBuf>,
    },
    /// Interactive terminal panel (default)
    Panel {
        /// Request to load on startup
        #[arg(short = 'r', long, value_name = "FILE")]
        request: Option<PathBuf>,
        /// Response to load together with --request
        #[arg(long, value_name = "FILE", requires = "request")]
        response: Option<PathBuf>,
        /// Keep a rendered HTML copy of the transcript in this file
        #[arg(long, value_name = "FILE")]
        html_out: Option<PathBuf>,
    },
    /// Serve the web panel
    Web {
        /// Bind address
        #[arg(long, default_value = "127.0.0.1", env = "LLMASSIST_WEB_BIND")]
        bind: String,
        /// Port
        #[arg(long, default_value = "8080", env = "LLMASSIST_WEB_PORT")]
        port: u16,
    },
    /// Print a file with credentials redacted
    Sanitize {
        /// File to sanitize
        file: PathBuf,
    },
    /// Render transcript-style text to HTML
    Render {
        /// File to render
        file: PathBuf,
        /// Wrap the output in a full HTML document
        #[arg(long)]
        document: bool,
    },
    /// Check that the inference server is reachable and has the model
    Check,
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Panel { request: None, response: None, html_out: None }
    }
}
