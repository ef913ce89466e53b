use std::collections::BTreeMap;
use svcprobe_common::{Environment, ServiceDescriptor};
use tracing::debug;

use crate::env_store::EnvironmentStore;

/// Tries `<NAME>_<ENV>` for every candidate first, then each plain `<NAME>`, in list order.
pub fn lookup_candidates<'e>(
    candidates: &[String],
    environment: Environment,
    env: &'e dyn EnvironmentStore,
) -> Option<&'e str> {
    candidates
        .iter()
        .find_map(|name| env.get(&format!("{name}_{environment}")))
        .or_else(|| candidates.iter().find_map(|name| env.get(name)))
}

/// Builds the final header map: literal defaults, overwritten by any
/// env-resolved values from `headerEnvVars`. Unresolvable headers are skipped.
pub fn resolve_headers(
    descriptor: &ServiceDescriptor,
    environment: Environment,
    env: &dyn EnvironmentStore,
) -> BTreeMap<String, String> {
    descriptor
        .header_env_vars
        .iter()
        .fold(descriptor.headers.clone(), |mut headers, (declared, names)| {
            // A header key that is itself an env var name is renamed to that var's value.
            let header_name = env.get(declared).unwrap_or(declared);
            match lookup_candidates(names.candidates(), environment, env) {
                Some(value) => {
                    headers.insert(header_name.to_string(), value.to_string());
                }
                None => {
                    debug!(service_id = %descriptor.id, header = %header_name, "Header could not be resolved from the environment.");
                }
            }
            headers
        })
}
