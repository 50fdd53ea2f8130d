pub mod oneshot;
pub mod repl;
pub mod setup;
pub mod web_server;

pub use oneshot::{print_completions, run_check, run_oneshot, run_render, run_sanitize};
pub use repl::run_repl_mode;
pub use setup::{read_exchange, setup_from_cli, AppConfig};
pub use web_server::run_web_server;
