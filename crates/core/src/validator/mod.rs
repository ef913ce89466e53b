//! Decides whether a response payload satisfies a declared structural expectation.
//!
//! Four independent strategies are tried in a fixed order and the first match
//! wins. A strategy that errors counts as a non-match.
pub mod flexible;
pub mod pattern;
pub mod schema;
pub mod structure;

use serde_json::Value;
use svcprobe_common::{FlexibleOptions, ResolvedService, ServiceType};
use thiserror::Error;
use tracing::{debug, warn};

use crate::transport::TransportResponse;

/// Deepest nesting any strategy will walk before giving up.
pub const MAX_DEPTH: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Value nesting exceeds the maximum depth of {0}")]
    DepthExceeded(usize),
    #[error("Derived schema does not compile: {0}")]
    InvalidSchema(String),
}

pub(crate) fn check_depth(depth: usize) -> Result<(), ValidationError> {
    if depth > MAX_DEPTH {
        return Err(ValidationError::DepthExceeded(MAX_DEPTH));
    }
    Ok(())
}

/// Which strategy produced a verdict. `None` is used when no strategy was consulted or none matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchStrategy {
    Structure,
    Schema,
    Pattern,
    Flexible,
    None,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStrategy::Structure => "structure",
            MatchStrategy::Schema => "schema",
            MatchStrategy::Pattern => "pattern",
            MatchStrategy::Flexible => "flexible",
            MatchStrategy::None => "none",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Structure,
    Schema,
    Pattern,
    Flexible(FlexibleOptions),
}

impl Strategy {
    /// All four strategies in evaluation order.
    pub fn ordered(options: FlexibleOptions) -> [Strategy; 4] {
        [
            Strategy::Structure,
            Strategy::Schema,
            Strategy::Pattern,
            Strategy::Flexible(options),
        ]
    }

    pub fn kind(&self) -> MatchStrategy {
        match self {
            Strategy::Structure => MatchStrategy::Structure,
            Strategy::Schema => MatchStrategy::Schema,
            Strategy::Pattern => MatchStrategy::Pattern,
            Strategy::Flexible(_) => MatchStrategy::Flexible,
        }
    }

    pub fn matches(&self, expected: &Value, actual: &Value) -> Result<bool, ValidationError> {
        match self {
            Strategy::Structure => structure::matches(expected, actual),
            Strategy::Schema => schema::matches(expected, actual),
            Strategy::Pattern => pattern::matches(expected, actual),
            Strategy::Flexible(options) => flexible::matches(expected, actual, *options),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationVerdict {
    pub passed: bool,
    pub strategy: MatchStrategy,
    pub reason: Option<String>,
}

impl ValidationVerdict {
    pub fn pass(strategy: MatchStrategy) -> Self {
        Self {
            passed: true,
            strategy,
            reason: None,
        }
    }

    pub fn fail(reason: impl Into<String>) -> Self {
        Self {
            passed: false,
            strategy: MatchStrategy::None,
            reason: Some(reason.into()),
        }
    }
}

/// Content check only. With no expectation the verdict passes trivially.
pub fn validate_content(
    expected: Option<&Value>,
    actual: &Value,
    options: FlexibleOptions,
) -> ValidationVerdict {
    let Some(expected) = expected else {
        return ValidationVerdict::pass(MatchStrategy::None);
    };

    for strategy in Strategy::ordered(options) {
        match strategy.matches(expected, actual) {
            Ok(true) => return ValidationVerdict::pass(strategy.kind()),
            Ok(false) => debug!(strategy = strategy.kind().as_str(), "Validation strategy did not match."),
            Err(e) => {
                warn!(strategy = strategy.kind().as_str(), error = %e, "Validation strategy failed, treating it as a non-match.")
            }
        }
    }

    ValidationVerdict::fail(
        "Response does not match the expected content (structure, schema, pattern and flexible checks all failed)",
    )
}

/// Top-level key naming a SOAP fault or error, compared case-insensitively.
pub fn find_fault(body: &Value) -> Option<&str> {
    body.as_object()?
        .keys()
        .find(|key| key.eq_ignore_ascii_case("fault") || key.eq_ignore_ascii_case("error"))
        .map(String::as_str)
}

fn is_success_status(status_code: u16) -> bool {
    (200..300).contains(&status_code)
}

/// Full verdict for one response.
///
/// SOAP faults fail unconditionally. A declared `expectedStatus` must match
/// exactly; without one, any non-2xx status fails. Only then is the body
/// checked against `expectedContent`.
pub fn validate_response(service: &ResolvedService, response: &TransportResponse) -> ValidationVerdict {
    if service.service_type == ServiceType::Soap {
        if let Some(key) = find_fault(&response.body) {
            return ValidationVerdict::fail(format!("SOAP response contains a '{key}' element"));
        }
    }

    match service.expected_status {
        Some(expected) if expected != response.status_code => {
            return ValidationVerdict::fail(format!(
                "Expected status {expected}, got {}",
                response.status_code
            ));
        }
        None if !is_success_status(response.status_code) => {
            return ValidationVerdict::fail(format!(
                "Request failed with status code {}",
                response.status_code
            ));
        }
        _ => {}
    }

    validate_content(service.expected_content.as_ref(), &response.body, service.validation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    fn service(service_type: ServiceType, expected_status: Option<u16>, expected_content: Option<Value>) -> ResolvedService {
        ResolvedService {
            id: "svc".to_string(),
            name: "Service".to_string(),
            service_type,
            url: Some("https://svc.example".to_string()),
            headers: BTreeMap::new(),
            method: None,
            body: None,
            args: None,
            expected_status,
            expected_content,
            validation: FlexibleOptions::default(),
            timeout_ms: None,
            soap_action: None,
            namespace: None,
        }
    }

    fn response(status_code: u16, body: Value) -> TransportResponse {
        TransportResponse {
            status_code,
            raw: body.to_string(),
            body,
            elapsed_ms: 5,
        }
    }

    fn nested(depth: usize) -> Value {
        (0..depth).fold(json!(1), |inner, _| json!({ "n": inner }))
    }

    #[test]
    fn test_no_expectation_passes_trivially() {
        let verdict = validate_content(None, &json!({ "anything": [1] }), FlexibleOptions::default());
        assert_eq!(verdict, ValidationVerdict::pass(MatchStrategy::None));
    }

    #[test]
    fn test_first_matching_strategy_is_reported() {
        let options = FlexibleOptions::default();
        let verdict = validate_content(Some(&json!({ "a": 99, "b": [7, 8] })), &json!({ "a": 1, "b": [1, 2] }), options);
        assert_eq!(verdict.strategy, MatchStrategy::Structure);

        // Extra keys defeat structure, schema and pattern; flexible tolerates them.
        let verdict = validate_content(Some(&json!({ "a": 1, "b": 2 })), &json!({ "a": 1, "b": 2, "c": 3 }), options);
        assert!(verdict.passed);
        assert_eq!(verdict.strategy, MatchStrategy::Flexible);
    }

    #[test]
    fn test_structure_and_schema_both_reject_extra_keys() {
        let expected = json!({ "a": 1, "b": 2 });
        let actual = json!({ "a": 1, "b": 2, "c": 3 });
        assert!(!Strategy::Structure.matches(&expected, &actual).unwrap());
        assert!(!Strategy::Schema.matches(&expected, &actual).unwrap());
    }

    #[test]
    fn test_all_strategies_failing_yields_reason() {
        let options = FlexibleOptions {
            type_strict: true,
            allow_extra_fields: false,
        };
        let verdict = validate_content(Some(&json!({ "a": 1 })), &json!({ "b": 1 }), options);
        assert!(!verdict.passed);
        assert_eq!(verdict.strategy, MatchStrategy::None);
        assert!(verdict.reason.unwrap().contains("does not match"));
    }

    #[test]
    fn test_depth_errors_count_as_non_match() {
        let deep = nested(MAX_DEPTH + 5);
        assert_eq!(
            Strategy::Structure.matches(&deep, &deep),
            Err(ValidationError::DepthExceeded(MAX_DEPTH))
        );
        let verdict = validate_content(Some(&deep), &deep, FlexibleOptions::default());
        assert!(!verdict.passed);
    }

    #[test]
    fn test_deeply_nested_identical_payload_passes() {
        let deep = nested(100);
        let verdict = validate_content(Some(&deep), &deep, FlexibleOptions::default());
        assert!(verdict.passed);
        assert_eq!(verdict.strategy, MatchStrategy::Structure);
        assert_eq!(Strategy::Pattern.matches(&deep, &deep), Ok(true));
        assert_eq!(Strategy::Flexible(FlexibleOptions::default()).matches(&deep, &deep), Ok(true));
    }

    #[test]
    fn test_expected_status_is_a_hard_precondition() {
        let svc = service(ServiceType::Rest, Some(200), Some(json!({ "ok": true })));
        let verdict = validate_response(&svc, &response(404, json!({ "ok": true })));
        assert!(!verdict.passed);
        assert_eq!(verdict.reason.as_deref(), Some("Expected status 200, got 404"));
    }

    #[test]
    fn test_declared_status_may_be_non_2xx() {
        let svc = service(ServiceType::Rest, Some(401), None);
        assert!(validate_response(&svc, &response(401, json!("Unauthorized"))).passed);
    }

    #[test]
    fn test_non_2xx_fails_without_declared_status() {
        let svc = service(ServiceType::Rest, None, None);
        assert!(!validate_response(&svc, &response(503, Value::Null)).passed);
        assert!(validate_response(&svc, &response(204, Value::Null)).passed);
    }

    #[test]
    fn test_soap_fault_always_fails() {
        let body = json!({ "Fault": { "faultcode": "soap:Server", "faultstring": "boom" } });
        // The expectation would match structurally, but the fault wins.
        let svc = service(ServiceType::Soap, None, Some(body.clone()));
        let verdict = validate_response(&svc, &response(200, body));
        assert!(!verdict.passed);
        assert!(verdict.reason.unwrap().contains("Fault"));

        let svc = service(ServiceType::Soap, None, None);
        assert!(!validate_response(&svc, &response(200, json!({ "ERROR": "x" }))).passed);
    }

    #[test]
    fn test_soap_fault_is_reported_before_status_mismatch() {
        let svc = service(ServiceType::Soap, Some(200), None);
        let body = json!({ "Fault": { "faultstring": "Server was unable to process request" } });
        let verdict = validate_response(&svc, &response(500, body));
        assert!(!verdict.passed);
        assert_eq!(verdict.reason.as_deref(), Some("SOAP response contains a 'Fault' element"));
    }

    #[test]
    fn test_fault_key_only_checked_for_soap() {
        let svc = service(ServiceType::Rest, Some(200), None);
        assert!(validate_response(&svc, &response(200, json!({ "error": null }))).passed);
    }
}
