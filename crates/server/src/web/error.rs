use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use svcprobe_common::UnknownEnvironment;
use svcprobe_core::{CheckError, ConfigLoadError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConfigError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Configuration error: {msg}"),
            ),
        };
        (status, Json(serde_json::json!({ "error": error_message }))).into_response()
    }
}

impl From<UnknownEnvironment> for AppError {
    fn from(err: UnknownEnvironment) -> Self {
        AppError::InvalidInput(err.to_string())
    }
}

impl From<ConfigLoadError> for AppError {
    fn from(err: ConfigLoadError) -> Self {
        AppError::ConfigError(err.to_string())
    }
}

impl From<CheckError> for AppError {
    fn from(err: CheckError) -> Self {
        AppError::NotFound(err.to_string())
    }
}
