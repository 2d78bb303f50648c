//! Web server for the upload page.

use std::net::{IpAddr, SocketAddr};

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;

use crate::config::Config;
use crate::{Result, UploadError};

use super::handlers::AppState;
use super::router::create_router;

/// Web server serving the upload page.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: AppState,
    /// Request body ceiling in bytes.
    max_request_size: Option<usize>,
}

impl WebServer {
    /// Create a new web server.
    ///
    /// Creates the upload directory if it doesn't exist yet.
    pub fn new(config: &Config) -> Result<Self> {
        let ip: IpAddr = config.server.host.parse().map_err(|e| {
            UploadError::Config(format!("invalid host {:?}: {e}", config.server.host))
        })?;
        let addr = SocketAddr::new(ip, config.server.port);

        let app_state = AppState::from_config(config)?;
        tracing::info!("Upload store initialized at: {}", config.uploads.path);

        let max_request_size = config
            .uploads
            .max_request_size_bytes
            .map(|n| usize::try_from(n).unwrap_or(usize::MAX));

        Ok(Self {
            addr,
            app_state,
            max_request_size,
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn bind(self) -> std::io::Result<(TcpListener, Router)> {
        let router = create_router(self.app_state, self.max_request_size);
        let listener = TcpListener::bind(self.addr).await?;

        match self.max_request_size {
            Some(limit) => tracing::info!("Request body limit: {} bytes", limit),
            None => tracing::info!("Request body limit: none"),
        }
        tracing::info!("Web server listening on http://{}", listener.local_addr()?);

        Ok((listener, router))
    }

    /// Run the web server until Ctrl-C or SIGTERM.
    pub async fn run(self) -> std::io::Result<()> {
        let (listener, router) = self.bind().await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Web server shut down");
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> std::io::Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl-C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl-C received, shutting down"),
        _ = terminate => tracing::info!("SIGTERM received, shutting down"),
    }
}
