//! Knowledge assistant server binary
//!
//! Run with: cargo run -p knowledge-assistant --bin knowledge-assistant-server

use knowledge_assistant::{config::AppConfig, server::AssistantServer, Error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "knowledge_assistant=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                   Knowledge Assistant                     ║
║          Chat with your PDF, Word and text files          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration; a missing API key is fatal
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            if let Error::MissingSecret(var) = &e {
                tracing::error!("Set {} in the environment or in a .env file", var);
            }
            std::process::exit(1);
        }
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Completion service: {}", config.llm.base_url);
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - Context limit: {} characters", config.ingestion.context_char_limit);
    if config.secrets.has_alternate_key() {
        tracing::info!("  - Alternate inference key present");
    }

    let server = AssistantServer::new(config)?;

    // Check the completion service; /ready stays 503 until it answers
    if server.state().refresh_ready().await {
        tracing::info!("Completion service is reachable");
    } else {
        tracing::warn!("Completion service did not answer the health check; questions may fail");
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/sessions                - Start a session");
    println!("  POST /api/sessions/:id/documents  - Upload documents");
    println!("  POST /api/sessions/:id/messages   - Ask questions");
    println!("  POST /api/sessions/:id/reset      - New chat");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
