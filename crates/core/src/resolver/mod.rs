//! Turns catalog descriptors into directly callable service definitions for one environment.
pub mod headers;
pub mod url_rules;

use svcprobe_common::{Environment, ResolvedService, ServiceDescriptor};
use tracing::{debug, info};

use crate::env_store::EnvironmentStore;

pub use headers::resolve_headers;
pub use url_rules::{join_url, resolve_url};

/// The `environmentUrls` value for `environment`; keys compare case-insensitively.
pub(crate) fn environment_url_entry(
    descriptor: &ServiceDescriptor,
    environment: Environment,
) -> Option<&str> {
    descriptor
        .environment_urls
        .iter()
        .find(|(name, _)| environment.matches(name))
        .map(|(_, value)| value.as_str())
}

/// Whether a descriptor takes part in checks for `environment`.
pub fn applies_to(descriptor: &ServiceDescriptor, environment: Environment) -> bool {
    let in_environment = environment_url_entry(descriptor, environment).is_some()
        || descriptor
            .environment
            .as_deref()
            .map_or(true, |pinned| environment.matches(pinned));
    in_environment && descriptor.is_enabled()
}

pub fn resolve_service(
    descriptor: &ServiceDescriptor,
    environment: Environment,
    env: &dyn EnvironmentStore,
) -> ResolvedService {
    let url = resolve_url(descriptor, environment, env);
    if url.is_none() {
        debug!(service_id = %descriptor.id, "No URL could be resolved for service.");
    }

    ResolvedService {
        id: descriptor.id.clone(),
        name: descriptor.name.clone(),
        service_type: descriptor.service_type,
        url,
        headers: resolve_headers(descriptor, environment, env),
        method: descriptor.method.clone(),
        body: descriptor.body.clone(),
        args: descriptor.args.clone(),
        expected_status: descriptor.expected_status,
        expected_content: descriptor.expected_content.clone(),
        validation: descriptor.validation.unwrap_or_default(),
        timeout_ms: descriptor.timeout_ms,
        soap_action: descriptor.soap_action.clone(),
        namespace: descriptor.namespace.clone(),
    }
}

/// Filters the catalog for `environment` and resolves the survivors, keeping catalog order.
pub fn resolve_catalog(
    catalog: &[ServiceDescriptor],
    environment: Environment,
    env: &dyn EnvironmentStore,
) -> Vec<ResolvedService> {
    let resolved: Vec<ResolvedService> = catalog
        .iter()
        .filter(|descriptor| {
            let keep = applies_to(descriptor, environment);
            if !keep {
                debug!(service_id = %descriptor.id, environment = %environment, "Service skipped for environment.");
            }
            keep
        })
        .map(|descriptor| resolve_service(descriptor, environment, env))
        .collect();

    info!(
        environment = %environment,
        total = catalog.len(),
        included = resolved.len(),
        "Resolved service catalog."
    );
    resolved
}
