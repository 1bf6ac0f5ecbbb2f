//! HTTP lookup server.
//!
//! Serves `GET /{key}` out of a [`SecretStore`] that is moved in at
//! construction and never written again, so handlers read it without locks.

pub mod routes;

pub use routes::{build_routes, ApiError, ErrorBody};

use crate::store::SecretStore;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

/// The lookup server.
pub struct SidecarServer {
    store: Arc<SecretStore>,
    addr: SocketAddr,
}

impl SidecarServer {
    /// Take ownership of the loaded store.
    pub fn new(store: SecretStore, addr: SocketAddr) -> Self {
        Self {
            store: Arc::new(store),
            addr,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Bind and serve until Ctrl+C or SIGTERM.
    pub async fn run_until_shutdown(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr)
            .await
            .with_context(|| format!("Failed to bind {}", self.addr))?;

        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already-bound listener until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let local_addr = listener.local_addr().context("Listener has no local address")?;
        info!(
            addr = %local_addr,
            secrets = self.store.len(),
            "secret-sidecar v{} listening",
            env!("CARGO_PKG_VERSION")
        );

        let app = build_routes(self.store);
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .context("Server error")?;

        info!("Server shut down gracefully");
        Ok(())
    }
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
