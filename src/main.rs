use std::sync::Arc;

use anyhow::Context;

use laundry_chat::api::HttpGateway;
use laundry_chat::channels::http::{self, ChatRouteState};
use laundry_chat::channels::CliChannel;
use laundry_chat::chat::Chatbot;
use laundry_chat::config::{self, BotConfig};
use laundry_chat::services::Services;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let (api_config, server_config) = config::load_from_env().context("invalid configuration")?;

    let gateway = HttpGateway::new(&api_config).context("failed to build HTTP client")?;
    let services = Services::new(Arc::new(gateway), &api_config);
    let bot_config = BotConfig::default();

    eprintln!("🧺 Laundry Chat v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Backend: {}", api_config.base_url);
    eprintln!("   Timeout: {}s", api_config.timeout.as_secs());

    match server_config {
        Some(server) => {
            eprintln!("   Chat API: http://{}:{}/api/chat\n", server.host, server.port);
            let state = ChatRouteState::new(services, bot_config)
                .with_session_timeout(server.session_timeout);
            http::serve(&server, state)
                .await
                .context("chat HTTP adapter failed")?;
        }
        None => {
            eprintln!("   Type a message and press Enter. Finish Key: Value blocks with an empty line.");
            eprintln!("   /quit to exit.\n");
            let bot = Chatbot::new(services, bot_config);
            CliChannel::new(bot).run().await.context("CLI channel failed")?;
        }
    }

    Ok(())
}
