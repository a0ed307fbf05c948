use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use citta::{GeminiProvider, TextProxy};
use citta_server::{Env, app};
use tracing_subscriber::prelude::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let env = Env::load().context("failed to load environment")?;
    let config = env.proxy_config();

    if config.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; every request will fail with 500");
    }

    let proxy = Arc::new(TextProxy::new(&config, GeminiProvider::new(&config))?);
    tracing::info!(
        model = %config.model,
        template = %config.template,
        static_dir = %env.static_dir.display(),
        "proxy_configured"
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], env.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %addr, "server_listening");

    axum::serve(listener, app(proxy, &env.static_dir))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install CTRL+C signal handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown_signal_received");
}
