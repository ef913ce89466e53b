use crate::web::models::health_check_models::{EnvironmentQuery, ServiceListResponse, ServiceSummary};
use crate::web::{AppError, AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn create_service_router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_services))
}

#[axum::debug_handler]
async fn list_services(
    State(app_state): State<Arc<AppState>>,
    Query(query): Query<EnvironmentQuery>,
) -> Result<Json<ServiceListResponse>, AppError> {
    let environment = app_state.environment(query.environment.as_deref())?;
    let services = app_state.resolve_services(environment)?;
    Ok(Json(ServiceListResponse {
        environment,
        services: services.iter().map(ServiceSummary::from).collect(),
    }))
}
