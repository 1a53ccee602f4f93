//! # HTTP Server
//!
//! Combines the table, status, and asset routes into one axum server.

use std::io;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use super::config::HttpServerConfig;
use super::db_routes::db_routes;
use super::state::AppState;
use super::status_routes::{health_routes, status_routes};

/// HTTP server for the gateway
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over `state`, serving static assets from `assets_dir`
    pub fn new(config: HttpServerConfig, state: AppState, assets_dir: impl Into<PathBuf>) -> Self {
        let router = build_router(state, &assets_dir.into(), &config.cors_origins);
        Self { config, router }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Bind and serve until SIGINT or SIGTERM
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid socket address '{}': {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "tablegate listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(wait_for_shutdown())
            .await?;

        tracing::info!("server stopped");
        Ok(())
    }
}

/// Build the combined router.
///
/// `/api/db` requires a bearer key; `/api/status`, `/health`, and the
/// static assets do not.
pub fn build_router(state: AppState, assets_dir: &Path, cors_origins: &[String]) -> Router {
    let cors = if cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = cors_origins
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let api = Router::new()
        .merge(db_routes(state.clone()))
        .merge(status_routes());

    Router::new()
        .route_service("/", ServeFile::new(assets_dir.join("index.html")))
        .route_service("/favicon.ico", ServeFile::new(assets_dir.join("favicon.ico")))
        .merge(health_routes())
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Wait for SIGINT or SIGTERM
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "failed to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::KeyRegistry;
    use crate::status::StatusReporter;
    use crate::store::TableStore;

    async fn state() -> AppState {
        AppState::new(
            KeyRegistry::default(),
            TableStore::in_memory().await.unwrap(),
            StatusReporter::new(),
        )
    }

    #[tokio::test]
    async fn test_server_socket_addr() {
        let config = HttpServerConfig {
            port: 8080,
            ..Default::default()
        };
        let server = HttpServer::new(config, state().await, "assets");
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[tokio::test]
    async fn test_router_builds_with_cors_origins() {
        let origins = vec!["http://localhost:5173".to_string()];
        let _router = build_router(state().await, Path::new("assets"), &origins);
    }
}
