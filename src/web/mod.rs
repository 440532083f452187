//! Web layer module
//!
//! Routes:
//! - `GET /v1/lookup/{vin}`
//! - `DELETE /v1/remove/{vin}`
//! - `GET /v1/export`
//! - `GET /health`
//! - `GET /docs` and `GET /api/openapi.json`

use anyhow::Result;
use axum::{
    Router,
    routing::{delete, get},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::Config, database::Database, services::VinCacheService};

pub mod extractors;
pub mod handlers;
pub mod openapi;
pub mod responses;
pub mod utils;

pub use responses::{ErrorResponse, MessageResponse, VinLookupResponse};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub database: Database,
    pub vin_cache: VinCacheService,
}

impl AppState {
    pub fn new(config: Config, database: Database, vin_cache: VinCacheService) -> Self {
        Self {
            config: Arc::new(config),
            database,
            vin_cache,
        }
    }
}

/// Build the router with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(SwaggerUi::new("/docs").url("/api/openapi.json", openapi::ApiDoc::openapi()))
        .nest("/v1", api_v1_routes())
        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/lookup/{vin}", get(handlers::vins::lookup_vin))
        .route("/remove/{vin}", delete(handlers::vins::remove_vin))
        .route("/export", get(handlers::vins::export_vins))
}

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(state: AppState) -> Result<Self> {
        let addr: SocketAddr =
            format!("{}:{}", state.config.web.host, state.config.web.port).parse()?;
        Ok(Self {
            app: create_app(state),
            addr,
        })
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Serve until Ctrl-C or SIGTERM
    pub async fn serve(self) -> Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
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
        _ = ctrl_c => tracing::info!("Received SIGINT (Ctrl+C), shutting down gracefully"),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down gracefully"),
    }
}
