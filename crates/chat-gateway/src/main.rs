//! Example bot
//!
//! Run with:
//! ```bash
//! BOT_TOKEN=... cargo run -p chat-gateway --bin chat-bot
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use anyhow::Context as _;
use chat_common::{try_init_tracing_with_config, ClientConfig, ConfigError, TracingConfig};
use chat_gateway::{Event, EventKind, GatewayClient};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "Bot failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = ClientConfig::from_env().context("Failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_client(config.debug)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    let token = std::env::var("BOT_TOKEN").map_err(|_| ConfigError::MissingVar("BOT_TOKEN"))?;

    info!(intents = %config.intents, debug = config.debug, "Starting bot");

    let client = GatewayClient::new(config)?;

    client.register(EventKind::Ready, |ctx, _| {
        if let Some(user) = ctx.current_user() {
            info!(user = %user.tag(), "Logged in");
        }
    });

    client.register(EventKind::MessageCreate, |ctx, event| {
        let Event::MessageCreate(message) = event else {
            return;
        };
        if message.is_from_bot() || message.content.trim() != "!ping" {
            return;
        }

        tokio::spawn(async move {
            if let Err(e) = ctx.http().reply(&message, ["pong"]).await {
                error!(error = %e, channel_id = %message.channel_id, "Failed to reply");
            }
        });
    });

    client.login(token).await?;

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;

    info!("Shutting down");
    client.close().await?;

    Ok(())
}
