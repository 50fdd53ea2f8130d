use thiserror::Error;

/// Every failure the assistant can surface to a user.
///
/// None of these are fatal: the panel turns each one into a visible
/// message and stays usable for the next action.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssistError {
    /// Analysis-style workflows need a loaded request first.
    #[error("No context loaded. Load a request before running an analysis.")]
    NoContext,

    /// The inference server answered with something other than 200.
    #[error("Error {0}")]
    HttpStatus(u16),

    /// Connect, timeout or body read failure talking to the inference server.
    #[error("Connection Error - {0}")]
    Connection(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
