//! # Open Service Broker Server
//!
//! The HTTP adapter around [`osb_broker::Broker`]: Axum routes for the OSB v2 protocol,
//! Basic auth and version checks, `/health`, and Scalar docs at `/docs`.
//!
//! ## Example
//! ```no_run
//! use osb_server::Server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Server::builder()
//!         .port(3000)
//!         .build()?
//!         .run()
//!         .await
//! }
//! ```

mod api;
pub mod error;
mod middleware;
pub mod router;

use anyhow::{Context, Result};
use axum::Router;
use axum_server::Handle;
use osb_domain::config::ApiConfig;
use osb_kernel::server::ApiState;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::signal;
use tracing::{error, info, warn};

const SHUTDOWN_GRACE: Duration = Duration::from_secs(30);

/// A fluent builder for configuring and initializing the [`Server`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Debug, Default)]
pub struct ServerBuilder {
    cfg: ApiConfig,
}

impl ServerBuilder {
    /// Set up the server's configuration.
    pub fn config(mut self, cfg: ApiConfig) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.cfg.server.port = port;
        self
    }

    /// Creates the broker core and the shared state.
    ///
    /// # Errors
    /// Returns an error if the API state cannot be assembled.
    pub fn build(self) -> Result<Server> {
        let address = SocketAddr::new(self.cfg.server.address, self.cfg.server.port);
        info!(address = %address, "Initializing server");

        if self.cfg.security.username.is_empty() && self.cfg.security.password.is_empty() {
            warn!("AUTH_USER and AUTH_PASSWORD are empty; /v2 expects empty Basic credentials");
        }

        let broker = osb_broker::init(&self.cfg.broker);
        let state = ApiState::builder()
            .config(self.cfg)
            .broker(broker)
            .build()
            .context("Failed to assemble API state")?;

        Ok(Server { state })
    }
}

/// A fully initialized server instance ready to run.
#[must_use = "call .run().await to start the server"]
#[derive(Debug)]
pub struct Server {
    state: ApiState,
}

impl Server {
    /// Returns a new [`ServerBuilder`] to configure the server.
    pub fn builder() -> ServerBuilder {
        ServerBuilder::default()
    }

    /// The complete Axum application, without binding a socket.
    #[must_use]
    pub fn router(&self) -> Router {
        router::init(self.state.clone())
    }

    /// Serves until SIGINT or SIGTERM, then drains in-flight requests.
    ///
    /// # Errors
    /// Returns an error if the server fails to bind to the configured address.
    pub async fn run(self) -> Result<()> {
        let cfg = self.state.config.clone();
        let address = SocketAddr::new(cfg.server.address, cfg.server.port);
        let app = self.router();

        let handle = Handle::<SocketAddr>::new();
        let shutdown_handle = handle.clone();

        tokio::spawn(async move {
            if let Err(e) = shutdown_signal().await {
                error!("Error while waiting for shutdown signal: {e}");
                return;
            }
            info!("Shutdown signal received, starting graceful shutdown...");
            shutdown_handle.graceful_shutdown(Some(SHUTDOWN_GRACE));
        });

        info!(
            address = %address,
            service_id = %cfg.broker.service_id(),
            plan_id = %cfg.broker.plan_id(),
            fake_async = cfg.broker.fake_async,
            fake_stateful = cfg.broker.fake_stateful,
            "Serving"
        );

        axum_server::bind(address)
            .handle(handle)
            .serve(app.into_make_service())
            .await
            .context("HTTP server failed")?;

        info!("Server shutdown complete");
        Ok(())
    }

    /// Returns a reference to the application state.
    #[must_use]
    pub const fn state(&self) -> &ApiState {
        &self.state
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("Failed to install Ctrl+C handler") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("Failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<_, anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => res?,
        res = terminate => res?,
    }

    Ok(())
}
