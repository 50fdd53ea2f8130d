// Web panel module
pub mod routes;
pub mod server;

pub use routes::{create_router, AppState, TranscriptView};
pub use server::{build_app, WebServer, WebServerConfig};
