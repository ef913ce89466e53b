use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum ServiceType {
    #[serde(alias = "rest", alias = "Rest")]
    Rest,
    #[serde(alias = "soap", alias = "Soap")]
    Soap,
}

/// One env-var name or an ordered list of candidates, as written in `headerEnvVars`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum EnvVarNames {
    One(String),
    Many(Vec<String>),
}

impl EnvVarNames {
    pub fn candidates(&self) -> &[String] {
        match self {
            EnvVarNames::One(name) => std::slice::from_ref(name),
            EnvVarNames::Many(names) => names,
        }
    }
}

fn default_true() -> bool {
    true
}

/// Options for the flexible matching strategy.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlexibleOptions {
    #[serde(default = "default_true")]
    pub type_strict: bool,
    #[serde(default = "default_true")]
    pub allow_extra_fields: bool,
}

impl Default for FlexibleOptions {
    fn default() -> Self {
        Self {
            type_strict: true,
            allow_extra_fields: true,
        }
    }
}

/// Author-written definition of one monitored endpoint, as it appears in the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub environment_urls: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url_env_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url_env_var: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub header_env_vars: BTreeMap<String, EnvVarNames>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_content: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soap_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<FlexibleOptions>,
}

impl ServiceDescriptor {
    /// Only an explicit `enabled: false` disables a descriptor.
    pub fn is_enabled(&self) -> bool {
        self.enabled != Some(false)
    }
}

/// A descriptor with every environment and variable indirection materialized.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedService {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub service_type: ServiceType,
    pub url: Option<String>,
    pub headers: BTreeMap<String, String>,
    pub method: Option<String>,
    pub body: Option<Value>,
    pub args: Option<Value>,
    pub expected_status: Option<u16>,
    pub expected_content: Option<Value>,
    pub validation: FlexibleOptions,
    pub timeout_ms: Option<u64>,
    pub soap_action: Option<String>,
    pub namespace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_descriptor_parses_camel_case_catalog_entry() {
        let raw = json!({
            "id": "orders",
            "name": "Orders API",
            "type": "rest",
            "environmentUrls": { "UAT": "ORDERS_URL_UAT" },
            "path": "/health",
            "headerEnvVars": {
                "x-api-key": ["ORDERS_KEY", "SHARED_KEY"],
                "x-tenant": "TENANT_ID"
            },
            "expectedStatus": 200,
            "expectedContent": { "status": "UP" }
        });

        let descriptor: ServiceDescriptor = serde_json::from_value(raw).unwrap();
        assert_eq!(descriptor.service_type, ServiceType::Rest);
        assert!(descriptor.is_enabled());
        assert_eq!(descriptor.environment_urls["UAT"], "ORDERS_URL_UAT");
        assert_eq!(
            descriptor.header_env_vars["x-api-key"].candidates(),
            ["ORDERS_KEY".to_string(), "SHARED_KEY".to_string()]
        );
        assert_eq!(descriptor.header_env_vars["x-tenant"].candidates(), ["TENANT_ID".to_string()]);
        assert_eq!(descriptor.expected_status, Some(200));
    }

    #[test]
    fn test_only_explicit_false_disables() {
        let mut descriptor: ServiceDescriptor =
            serde_json::from_value(json!({ "id": "a", "name": "A", "type": "SOAP" })).unwrap();
        assert!(descriptor.is_enabled());
        descriptor.enabled = Some(false);
        assert!(!descriptor.is_enabled());
    }

    #[test]
    fn test_flexible_options_default_when_fields_missing() {
        let options: FlexibleOptions = serde_json::from_value(json!({ "typeStrict": false })).unwrap();
        assert!(!options.type_strict);
        assert!(options.allow_extra_fields);
    }
}
