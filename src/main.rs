//! Helpdesk bot process entry point.
//!
//! Startup sequence:
//!   1. Load .env (if present)
//!   2. Load config
//!   3. Init logger at the configured level
//!   4. Initialize the bot (knowledge base, providers, index)
//!   5. Spawn Ctrl-C → shutdown watcher
//!   6. Serve the web UI until shutdown

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use helpdesk_bot::bot::Bot;
use helpdesk_bot::{config, error, logger, web};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), error::AppError> {
    // .env is optional.
    let _ = dotenvy::dotenv();

    let config = config::load()?;

    logger::init(&config.log_level)?;

    info!(
        app = %config.app_name,
        knowledge_base = %config.knowledge_base.display(),
        provider = %config.llm.provider,
        ssl_verify = config.llm.ssl_verify,
        "config loaded"
    );

    let bot = Arc::new(Bot::initialize(&config).await);

    let shutdown = CancellationToken::new();
    let ctrlc_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("ctrl-c received, initiating shutdown");
            ctrlc_token.cancel();
        }
    });

    web::serve(&config.http.bind, bot, shutdown).await
}
