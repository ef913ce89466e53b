use crate::server::persistence::persist_batch;
use crate::web::models::health_check_models::{EnvironmentQuery, HealthCheckRequest};
use crate::web::{AppError, AppState};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use std::collections::HashMap;
use std::sync::Arc;
use svcprobe_common::{BatchResult, CheckResult, Environment};

pub fn create_health_check_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(run_health_check).post(run_health_check_with_overrides))
        .route("/{id}", get(check_single_service))
}

async fn execute_batch(
    app_state: &AppState,
    environment: Environment,
    disabled: &HashMap<String, bool>,
) -> Result<BatchResult, AppError> {
    // Resolution errors abort before any network call.
    let services = app_state.resolve_services(environment)?;
    let batch = app_state
        .monitor
        .run_batch(&services, environment, disabled)
        .await;

    persist_batch(&app_state.config, &batch).await;
    Ok(batch)
}

#[axum::debug_handler]
async fn run_health_check(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<EnvironmentQuery>,
) -> Result<Json<BatchResult>, AppError> {
    let environment = app_state.environment(query.environment.as_deref())?;
    let batch = execute_batch(&app_state, environment, &HashMap::new()).await?;
    Ok(Json(batch))
}

#[axum::debug_handler]
async fn run_health_check_with_overrides(
    State(app_state): State<Arc<AppState>>,
    Json(payload): Json<HealthCheckRequest>,
) -> Result<Json<BatchResult>, AppError> {
    let environment = app_state.environment(payload.environment.as_deref())?;
    let batch = execute_batch(&app_state, environment, &payload.disabled_services).await?;
    Ok(Json(batch))
}

#[axum::debug_handler]
async fn check_single_service(
    State(app_state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<EnvironmentQuery>,
) -> Result<Json<CheckResult>, AppError> {
    let environment = app_state.environment(query.environment.as_deref())?;
    let services = app_state.resolve_services(environment)?;
    let result = app_state
        .monitor
        .check_one(&services, &id, environment)
        .await?;
    Ok(Json(result))
}
