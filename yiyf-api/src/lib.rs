//! # YIYF API Server
//!
//! HTTP backend of the youth program board: serves the static site and a small
//! JSON API over the cached program listings.
//!
//! ## Endpoints
//!
//! - `GET /health` - Liveness probe
//! - `GET /api/programs` - Cached program list (refreshes when stale)
//! - `POST /api/programs/refresh` - Drop the cache and refresh now
//! - `POST /api/programs/update` - Replace the curated fallback list
//! - `GET /*` - Files from the public directory
//!
//! ## Example
//!
//! ```rust,ignore
//! use yiyf_api::{ApiConfig, ApiServer};
//!
//! let server = ApiServer::from_config(ApiConfig::from_env())?;
//! server.run(([0, 0, 0, 0], 3000)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cors;
mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use cors::OriginPolicy;
pub use error::ApiError;
pub use routes::{create_router, MAX_BODY_BYTES};
pub use state::{ApiConfig, AppState, Environment};

use std::any::Any;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use yiyf_core::error::Result;

/// API server for the program board.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server around prepared state.
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates a server with the production collaborators for `config`.
    pub fn from_config(config: ApiConfig) -> Result<Self> {
        Ok(Self::new(AppState::from_config(config)?))
    }

    /// Shared state.
    pub fn state(&self) -> &Arc<AppState> {
        &self.state
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let expose = !self.state.config.environment.is_production();

        create_router(self.state.clone())
            .layer(CatchPanicLayer::custom(move |panic: Box<dyn Any + Send + 'static>| {
                error::panic_response(panic, expose)
            }))
            .layer(self.state.origins.layer())
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address until Ctrl+C or SIGTERM.
    ///
    /// Startup order: seed facilities (fatal on failure), load programs once
    /// (failure only logged), start the refresher, bind, serve.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> Result<()> {
        let addr = addr.into();
        let state = &self.state;

        info!("Initializing facility store");
        state.facilities.initialize_default_facilities().await?;
        info!("Facility store ready");

        match state.programs.refresh().await {
            Ok(outcome) => info!(
                count = outcome.snapshot.len(),
                origin = %outcome.origin,
                "Initial program load complete"
            ),
            Err(e) => error!(error = %e, "Initial program load failed"),
        }

        let refresher = state
            .programs
            .spawn_refresher(state.config.refresh_interval());

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!(
            environment = %state.config.environment,
            "YIYF program board listening on {}",
            addr
        );

        let served = axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await;

        refresher.abort();
        info!("Server stopped");
        served.map_err(Into::into)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received SIGTERM, shutting down");
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
}
