//! Runs checks for a resolved catalog, one service at a time.
use std::collections::HashMap;
use std::time::Instant;
use svcprobe_common::{
    BatchResult, CheckResult, CheckStatus, Environment, ResolvedService, ServiceDescriptor,
};
use thiserror::Error;
use tracing::{info, warn};

use crate::env_store::EnvironmentStore;
use crate::resolver::resolve_catalog;
use crate::transport::Transport;
use crate::validator::{validate_response, MatchStrategy};

pub const DISABLED_DETAILS: &str = "Service check disabled";

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("Service '{id}' not found for environment {environment}")]
    UnknownServiceId { id: String, environment: Environment },
}

pub fn find_service<'a>(
    services: &'a [ResolvedService],
    id: &str,
    environment: Environment,
) -> Result<&'a ResolvedService, CheckError> {
    services
        .iter()
        .find(|service| service.id == id)
        .ok_or_else(|| CheckError::UnknownServiceId {
            id: id.to_string(),
            environment,
        })
}

/// Checks services sequentially through a [`Transport`], pairing each response with its verdict.
pub struct ServiceMonitor<T: Transport> {
    transport: T,
}

impl<T: Transport> ServiceMonitor<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Invokes and validates a single service. Transport errors become a failed result.
    pub async fn check_service(&self, service: &ResolvedService) -> CheckResult {
        let start_time = Instant::now();
        let outcome = self.transport.invoke(service).await;

        let (status, details, response_time_ms, status_code, raw_response) = match outcome {
            Ok(response) => {
                let verdict = validate_response(service, &response);
                let (status, details) = if verdict.passed {
                    let details = match verdict.strategy {
                        MatchStrategy::None => "Service is healthy".to_string(),
                        strategy => format!(
                            "Response matched expected content ({} strategy)",
                            strategy.as_str()
                        ),
                    };
                    (CheckStatus::Success, details)
                } else {
                    let reason = verdict
                        .reason
                        .unwrap_or_else(|| "Response validation failed".to_string());
                    (CheckStatus::Failed, reason)
                };
                (
                    status,
                    details,
                    response.elapsed_ms,
                    Some(response.status_code),
                    Some(response.raw),
                )
            }
            Err(e) => {
                warn!(service_id = %service.id, error = %e, "Service call failed.");
                (
                    CheckStatus::Failed,
                    e.to_string(),
                    start_time.elapsed().as_millis() as u64,
                    None,
                    None,
                )
            }
        };

        info!(
            service_id = %service.id,
            status = ?status,
            response_time_ms,
            "Service check finished."
        );

        CheckResult {
            id: service.id.clone(),
            name: service.name.clone(),
            service_type: service.service_type,
            url: service.url.clone(),
            status,
            response_time_ms,
            status_code,
            timestamp: chrono::Utc::now(),
            details,
            raw_response,
        }
    }

    /// Checks every service in order. Services mapped to `true` in `disabled`
    /// are not called but still produce a failed row.
    pub async fn run_batch(
        &self,
        services: &[ResolvedService],
        environment: Environment,
        disabled: &HashMap<String, bool>,
    ) -> BatchResult {
        info!(environment = %environment, count = services.len(), "Starting health check batch.");

        let mut results = Vec::with_capacity(services.len());
        for service in services {
            if disabled.get(&service.id).copied().unwrap_or(false) {
                info!(service_id = %service.id, "Skipping disabled service.");
                results.push(disabled_result(service));
                continue;
            }
            results.push(self.check_service(service).await);
        }

        let batch = BatchResult::new(environment, results);
        info!(
            environment = %environment,
            total = batch.summary.total,
            success = batch.summary.success,
            failed = batch.summary.failed,
            "Health check batch finished."
        );
        batch
    }

    /// Resolves `catalog` for `environment` and runs the batch over it.
    pub async fn run_catalog(
        &self,
        catalog: &[ServiceDescriptor],
        environment: Environment,
        env: &dyn EnvironmentStore,
        disabled: &HashMap<String, bool>,
    ) -> BatchResult {
        let services = resolve_catalog(catalog, environment, env);
        self.run_batch(&services, environment, disabled).await
    }

    /// Checks one service by id; an id outside the filtered catalog is an error.
    pub async fn check_one(
        &self,
        services: &[ResolvedService],
        id: &str,
        environment: Environment,
    ) -> Result<CheckResult, CheckError> {
        let service = find_service(services, id, environment)?;
        Ok(self.check_service(service).await)
    }
}

fn disabled_result(service: &ResolvedService) -> CheckResult {
    CheckResult {
        id: service.id.clone(),
        name: service.name.clone(),
        service_type: service.service_type,
        url: service.url.clone(),
        status: CheckStatus::Failed,
        response_time_ms: 0,
        status_code: None,
        timestamp: chrono::Utc::now(),
        details: DISABLED_DETAILS.to_string(),
        raw_response: None,
    }
}
