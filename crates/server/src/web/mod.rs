use axum::{http::Method, routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use svcprobe_common::{Environment, ResolvedService};
use svcprobe_core::{load_catalog, resolve_catalog, EnvSnapshot, ServiceMonitor, Transport};
use tower_http::cors::{Any, CorsLayer};

use crate::server::config::ServerConfig;
use crate::web::routes::*;

pub mod error;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub monitor: Arc<ServiceMonitor<Arc<dyn Transport>>>,
}

impl AppState {
    pub fn new(config: Arc<ServerConfig>, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            monitor: Arc::new(ServiceMonitor::new(transport)),
        }
    }

    /// Parses the requested environment, falling back to the configured default.
    pub fn environment(&self, requested: Option<&str>) -> Result<Environment, AppError> {
        match requested.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => Ok(name.parse()?),
            None => Ok(self.config.default_environment),
        }
    }

    /// Reloads the catalog and resolves it against the current process environment.
    pub fn resolve_services(&self, environment: Environment) -> Result<Vec<ResolvedService>, AppError> {
        let env = EnvSnapshot::from_process();
        let catalog = load_catalog(self.config.catalog_path.as_deref().map(Path::new), &env)?;
        Ok(resolve_catalog(&catalog, environment, &env))
    }
}

async fn health_check_handler() -> &'static str {
    "OK"
}

pub fn create_axum_router(app_state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/api/health", get(health_check_handler))
        .nest("/api/services", create_service_router())
        .nest("/api/health-check", create_health_check_router())
        .layer(cors)
        .with_state(app_state)
}
