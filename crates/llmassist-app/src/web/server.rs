use anyhow::{Context, Result};
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use colored::Colorize;
use std::net::SocketAddr;
use tokio::sync::mpsc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::panel::{Completion, Panel};
use crate::web::routes;

/// Web server configuration
pub struct WebServerConfig {
    pub bind_addr: SocketAddr,
}

/// Web server instance
pub struct WebServer {
    config: WebServerConfig,
    state: routes::AppState,
}

impl WebServer {
    /// Create a new web server around `panel`. Must be called inside a runtime.
    pub fn new(
        config: WebServerConfig,
        panel: Panel,
        completions: mpsc::UnboundedReceiver<Completion>,
    ) -> Self {
        Self {
            config,
            state: routes::AppState::spawn(panel, completions),
        }
    }

    /// Start the web server
    pub async fn start(self) -> Result<()> {
        let app = build_app(self.state.clone(), self.config.bind_addr);

        println!("🌐 Web panel starting on http://{}", self.config.bind_addr);
        println!("   API endpoints: http://{}/api/transcript", self.config.bind_addr);

        let listener = tokio::net::TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.config.bind_addr))?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        println!("{}", "Web panel stopped".bright_black());
        self.state.panel.lock().await.shutdown().await;
        Ok(())
    }
}

/// Router plus a CORS policy that only admits the panel's own origin
pub fn build_app(state: routes::AppState, bind_addr: SocketAddr) -> Router {
    routes::create_router(state).layer(cors_layer(bind_addr))
}

fn cors_layer(bind_addr: SocketAddr) -> CorsLayer {
    let mut origins = vec![format!("http://{}", bind_addr)];
    if bind_addr.ip().is_loopback() {
        origins.push(format!("http://localhost:{}", bind_addr.port()));
    }
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE])
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
