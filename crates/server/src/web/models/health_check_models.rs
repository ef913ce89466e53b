use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use svcprobe_common::{Environment, ResolvedService, ServiceType};

#[derive(Deserialize, Debug, Clone, Default)]
pub struct EnvironmentQuery {
    pub environment: Option<String>,
}

// Body of POST /api/health-check
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheckRequest {
    pub environment: Option<String>,
    #[serde(default)]
    pub disabled_services: HashMap<String, bool>,
}

/// A resolved service as exposed over the API. Header values are withheld.
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ServiceSummary {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub url: Option<String>,
    pub header_names: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<u16>,
    pub has_expected_content: bool,
}

impl From<&ResolvedService> for ServiceSummary {
    fn from(service: &ResolvedService) -> Self {
        Self {
            id: service.id.clone(),
            name: service.name.clone(),
            service_type: service.service_type,
            url: service.url.clone(),
            header_names: service.headers.keys().cloned().collect(),
            expected_status: service.expected_status,
            has_expected_content: service.expected_content.is_some(),
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct ServiceListResponse {
    pub environment: Environment,
    pub services: Vec<ServiceSummary>,
}
