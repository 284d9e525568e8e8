//! Serve command handler.

use anyhow::Context;
use askrelay::{router, AppState};
use askrelay_core::config::AppConfig;
use clap::Args;

/// Run the HTTP server
#[derive(Args, Debug)]
pub struct ServeCommand {
    /// Address to bind
    #[arg(long, env = "ASKRELAY_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(long, env = "ASKRELAY_PORT")]
    pub port: Option<u16>,
}

impl ServeCommand {
    pub async fn execute(&self, config: &AppConfig) -> anyhow::Result<()> {
        let state = AppState::from_config(config)?;
        let address = config.bind_address();

        let listener = tokio::net::TcpListener::bind(&address)
            .await
            .with_context(|| format!("Failed to bind {}", address))?;

        tracing::info!(
            address = %address,
            provider = state.relay().provider_name(),
            model = state.relay().model(),
            "Listening"
        );

        axum::serve(listener, router(state))
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server terminated unexpectedly")?;

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received"),
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
