//! Axum-based HTTP server exposing the preview proxy.

pub mod handlers;
pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tokio::net::TcpListener;
use tracing::info;

use crate::adapters::HttpFetcher;
use crate::config::TomlConfig;
use crate::core::preview::PreviewService;
use crate::core::rewriter::AccessibilityRewriter;
use crate::core::styles::RewriteConfig;

pub use routes::create_router;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<PreviewService<HttpFetcher>>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(service: PreviewService<HttpFetcher>) -> Self {
        Self {
            service: Arc::new(service),
            started_at: Utc::now(),
        }
    }

    /// Builds the fetcher and the rewrite tables once from configuration.
    pub fn from_config(config: &TomlConfig) -> crate::utils::error::Result<Self> {
        let fetcher = HttpFetcher::from_config(config)?;
        let rewriter = AccessibilityRewriter::new(RewriteConfig::from_settings(&config.rewrite)?);
        Ok(Self::new(PreviewService::new(fetcher, rewriter)))
    }
}

pub struct PreviewServer {
    listen_addr: String,
    cors_enabled: bool,
    state: AppState,
}

impl PreviewServer {
    pub fn new(config: &TomlConfig, state: AppState) -> Self {
        Self {
            listen_addr: config.server.listen_addr.clone(),
            cors_enabled: config.server.cors_enabled,
            state,
        }
    }

    /// Run until Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let addr: SocketAddr = self
            .listen_addr
            .parse()
            .context("Invalid HTTP listen address")?;

        let listener = TcpListener::bind(&addr)
            .await
            .context("Failed to bind HTTP server")?;

        info!("a11y-lens listening on http://{}", addr);

        let app = create_router(self.state, self.cors_enabled);
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("HTTP server shutting down");
            })
            .await
            .context("HTTP server error")?;

        Ok(())
    }
}
