use anyhow::{Context, Result};
use std::net::SocketAddr;

use crate::app::setup::AppConfig;
use crate::panel::Panel;
use crate::web::server::{WebServer, WebServerConfig};

/// Run the web panel
pub async fn run_web_server(app: &AppConfig, bind: &str, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{}:{}", bind, port)
        .parse()
        .with_context(|| format!("Invalid bind address {}:{}", bind, port))?;

    println!("🌐 Starting llmassist web panel...");
    println!("   Address: {}", addr);
    println!("   Working directory: {}", app.work_dir.display());

    let (panel, completions) = Panel::new(app.assistant.clone(), app.client());
    let mut panel = panel.with_logger(app.logger().await);
    panel.greet();
    panel.sync().await;

    let server = WebServer::new(WebServerConfig { bind_addr: addr }, panel, completions);
    server.start().await
}
