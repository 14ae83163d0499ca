use anyhow::Result;
use tracing_subscriber::EnvFilter;

use bookchat::{build_chat_service, run_server, AppConfig};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "starting book chat");

    let chat = build_chat_service(&config);

    run_server(config, chat).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
