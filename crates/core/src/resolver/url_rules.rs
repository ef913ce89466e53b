//! Ordered URL resolution rules. Each rule is pure; the first one yielding a URL wins.
use svcprobe_common::{Environment, ServiceDescriptor};
use tracing::debug;

use super::environment_url_entry;
use crate::env_store::EnvironmentStore;

pub type UrlRule = fn(&ServiceDescriptor, Environment, &dyn EnvironmentStore) -> Option<String>;

/// Rules in precedence order, named after the descriptor fields they read.
pub const URL_RULES: [(&'static str, UrlRule); 4] = [
    ("environmentUrls", from_environment_urls),
    ("urlEnvVar", from_url_env_var),
    ("baseUrl/path", from_base_url_and_path),
    ("url", from_literal_url),
];

pub fn resolve_url(
    descriptor: &ServiceDescriptor,
    environment: Environment,
    env: &dyn EnvironmentStore,
) -> Option<String> {
    let (rule_name, url) = matching_rule(descriptor, environment, env)?;
    debug!(service_id = %descriptor.id, rule = rule_name, url = %url, "Resolved service URL.");
    Some(url)
}

/// The first rule yielding a URL, with that rule's name.
pub fn matching_rule(
    descriptor: &ServiceDescriptor,
    environment: Environment,
    env: &dyn EnvironmentStore,
) -> Option<(&'static str, String)> {
    URL_RULES
        .iter()
        .find_map(|(name, rule)| rule(descriptor, environment, env).map(|url| (*name, url)))
}

/// Joins base and path with exactly one slash. A lone base or path is returned verbatim.
pub fn join_url(base: Option<&str>, path: Option<&str>) -> Option<String> {
    let base = base.filter(|b| !b.is_empty());
    let path = path.filter(|p| !p.is_empty());
    match (base, path) {
        (Some(base), Some(path)) => Some(format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )),
        (Some(base), None) => Some(base.to_string()),
        (None, Some(path)) => Some(path.to_string()),
        (None, None) => None,
    }
}

/// `environmentUrls[E]` names an env var holding the base URL, or is the base URL itself.
pub fn from_environment_urls(
    descriptor: &ServiceDescriptor,
    environment: Environment,
    env: &dyn EnvironmentStore,
) -> Option<String> {
    let candidate = environment_url_entry(descriptor, environment)?;
    let base = env.get(candidate).unwrap_or(candidate);
    join_url(Some(base), descriptor.path.as_deref())
}

pub fn from_url_env_var(
    descriptor: &ServiceDescriptor,
    _environment: Environment,
    env: &dyn EnvironmentStore,
) -> Option<String> {
    let name = descriptor.url_env_var.as_deref()?;
    env.get(name).map(str::to_string)
}

pub fn from_base_url_and_path(
    descriptor: &ServiceDescriptor,
    _environment: Environment,
    env: &dyn EnvironmentStore,
) -> Option<String> {
    let base = descriptor
        .base_url_env_var
        .as_deref()
        .and_then(|name| env.get(name))
        .or(descriptor.base_url.as_deref());
    join_url(base, descriptor.path.as_deref())
}

pub fn from_literal_url(
    descriptor: &ServiceDescriptor,
    _environment: Environment,
    _env: &dyn EnvironmentStore,
) -> Option<String> {
    descriptor.url.clone().filter(|url| !url.is_empty())
}
