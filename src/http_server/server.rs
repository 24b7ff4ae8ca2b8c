//! # HTTP Server
//!
//! Main HTTP server combining the dataset and observability routers over
//! one shared registry.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::facade::DatasetRegistry;

use super::config::HttpServerConfig;
use super::dataset_routes::dataset_routes;
use super::observability_routes::observability_routes;

/// State shared by every handler
#[derive(Debug, Clone)]
pub struct AppState {
    pub registry: Arc<DatasetRegistry>,
}

impl AppState {
    pub fn new(registry: Arc<DatasetRegistry>) -> Self {
        Self { registry }
    }
}

/// HTTP server for the query engine
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server with default configuration
    pub fn new(registry: Arc<DatasetRegistry>) -> Self {
        Self::with_config(HttpServerConfig::default(), registry)
    }

    /// Create a server with custom configuration
    pub fn with_config(config: HttpServerConfig, registry: Arc<DatasetRegistry>) -> Self {
        let router = Self::build_router(&config, Arc::new(AppState::new(registry)));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<AppState>) -> Router {
        Router::new()
            .merge(dataset_routes(Arc::clone(&state)))
            .merge(observability_routes(state))
            .layer(Self::cors_layer(&config.cors_origins))
            .layer(TraceLayer::new_for_http())
    }

    fn cors_layer(origins: &[String]) -> CorsLayer {
        if origins.is_empty() {
            return CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
        }

        let allowed: Vec<_> = origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(%origin, "ignoring invalid CORS origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(allowed))
            .allow_methods(Any)
            .allow_headers(Any)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Start the HTTP server (async)
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        tracing::info!(%addr, "http server listening");

        axum::serve(listener, self.router).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_creation() {
        let server = HttpServer::new(Arc::new(DatasetRegistry::new()));
        assert_eq!(server.socket_addr(), "0.0.0.0:4321");
    }

    #[test]
    fn test_server_with_custom_port() {
        let config = HttpServerConfig::with_port(8080);
        let server = HttpServer::with_config(config, Arc::new(DatasetRegistry::new()));
        assert_eq!(server.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_router_builds_with_permissive_cors() {
        let config = HttpServerConfig {
            cors_origins: Vec::new(),
            ..Default::default()
        };
        let _router = HttpServer::with_config(config, Arc::new(DatasetRegistry::new())).router();
    }
}
