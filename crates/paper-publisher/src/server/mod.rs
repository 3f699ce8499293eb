//! HTTP API server.

pub mod routes;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::pipeline::Publisher;

/// HTTP front end for the publishing flows.
pub struct ApiServer {
    publisher: Arc<Publisher>,
}

impl ApiServer {
    /// Create a new API server.
    #[must_use]
    pub fn new(publisher: Publisher) -> Self {
        Self {
            publisher: Arc::new(publisher),
        }
    }

    /// Serve the API on all interfaces until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Returns error on bind or server failure.
    pub async fn run_http(self, port: u16) -> anyhow::Result<()> {
        let router = routes::create_router(self.publisher);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        tracing::info!("HTTP server listening on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

        tracing::info!("HTTP server shut down");
        Ok(())
    }
}

impl std::fmt::Debug for ApiServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiServer").field("publisher", &self.publisher).finish()
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    tracing::info!("Received shutdown signal");
}
