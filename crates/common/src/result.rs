use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::descriptor::ServiceType;
use crate::environment::Environment;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    Success,
    Failed,
}

/// Outcome of checking a single service. Never mutated after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CheckResult {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub url: Option<String>,
    pub status: CheckStatus,
    pub response_time_ms: u64,
    pub status_code: Option<u16>,
    pub timestamp: DateTime<Utc>,
    pub details: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

impl CheckResult {
    pub fn is_success(&self) -> bool {
        self.status == CheckStatus::Success
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub timestamp: DateTime<Utc>,
    pub environment: Environment,
    pub services: Vec<CheckResult>,
    pub summary: BatchSummary,
}

impl BatchResult {
    pub fn new(environment: Environment, services: Vec<CheckResult>) -> Self {
        let success = services.iter().filter(|r| r.is_success()).count();
        let summary = BatchSummary {
            total: services.len(),
            success,
            failed: services.len() - success,
        };
        Self {
            timestamp: Utc::now(),
            environment,
            services,
            summary,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, status: CheckStatus) -> CheckResult {
        CheckResult {
            id: id.to_string(),
            name: id.to_uppercase(),
            service_type: ServiceType::Rest,
            url: None,
            status,
            response_time_ms: 12,
            status_code: Some(200),
            timestamp: Utc::now(),
            details: String::new(),
            raw_response: None,
        }
    }

    #[test]
    fn test_batch_summary_counts() {
        let batch = BatchResult::new(
            Environment::Qa,
            vec![
                result("a", CheckStatus::Success),
                result("b", CheckStatus::Failed),
                result("c", CheckStatus::Success),
            ],
        );
        assert_eq!(
            batch.summary,
            BatchSummary {
                total: 3,
                success: 2,
                failed: 1
            }
        );
    }

    #[test]
    fn test_check_result_serializes_wire_names() {
        let value = serde_json::to_value(result("a", CheckStatus::Failed)).unwrap();
        assert_eq!(value["status"], "failed");
        assert_eq!(value["type"], "REST");
        assert_eq!(value["responseTimeMs"], 12);
        assert_eq!(value["statusCode"], 200);
        assert!(value.get("rawResponse").is_none());
    }
}
