//! Loading the service catalog from disk.
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use svcprobe_common::ServiceDescriptor;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::env_store::EnvironmentStore;

/// Environment variable that overrides the catalog location.
pub const CATALOG_PATH_ENV: &str = "SERVICES_CONFIG_PATH";
pub const DEFAULT_CATALOG_PATH: &str = "config/services.json";

const EXAMPLE_CATALOG: &str = include_str!("../assets/example_catalog.json");

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Service catalog not found at {0:?}")]
    NotFound(PathBuf),
    #[error("Failed to read service catalog at {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse service catalog from {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("Duplicate service id '{0}' in catalog")]
    DuplicateId(String),
}

// Both a bare array and a `{ "services": [...] }` wrapper are accepted.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogDocument {
    List(Vec<ServiceDescriptor>),
    Wrapped { services: Vec<ServiceDescriptor> },
}

/// Picks the catalog path. The flag is true when the path was explicitly requested.
pub fn catalog_path(explicit: Option<&Path>, env: &dyn EnvironmentStore) -> (PathBuf, bool) {
    catalog_path_with_default(explicit, env, Path::new(DEFAULT_CATALOG_PATH))
}

fn catalog_path_with_default(
    explicit: Option<&Path>,
    env: &dyn EnvironmentStore,
    default: &Path,
) -> (PathBuf, bool) {
    if let Some(path) = explicit {
        return (path.to_path_buf(), true);
    }
    if let Some(path) = env.get(CATALOG_PATH_ENV) {
        return (PathBuf::from(path), true);
    }
    (default.to_path_buf(), false)
}

/// Loads the catalog in declaration order.
///
/// A missing file is fatal when the path was requested by the caller or through
/// `SERVICES_CONFIG_PATH`; a missing default file falls back to the built-in
/// example catalog.
pub fn load_catalog(
    explicit: Option<&Path>,
    env: &dyn EnvironmentStore,
) -> Result<Vec<ServiceDescriptor>, ConfigLoadError> {
    load_catalog_from(Path::new(DEFAULT_CATALOG_PATH), explicit, env)
}

/// Same as [`load_catalog`] with `default` in place of `config/services.json`.
pub fn load_catalog_from(
    default: &Path,
    explicit: Option<&Path>,
    env: &dyn EnvironmentStore,
) -> Result<Vec<ServiceDescriptor>, ConfigLoadError> {
    let (path, requested) = catalog_path_with_default(explicit, env, default);

    if !path.exists() {
        if requested {
            error!(path = ?path, "Service catalog file does not exist.");
            return Err(ConfigLoadError::NotFound(path));
        }
        warn!(path = ?path, "No service catalog found, using the built-in example catalog.");
        return example_catalog();
    }

    let contents = fs::read_to_string(&path).map_err(|e| {
        error!(path = ?path, error = %e, "Failed to read service catalog.");
        ConfigLoadError::Read {
            path: path.clone(),
            source: e,
        }
    })?;

    let services = parse_catalog(&contents, &path.display().to_string())?;
    info!(path = ?path, count = services.len(), "Loaded service catalog.");
    Ok(services)
}

pub fn parse_catalog(contents: &str, origin: &str) -> Result<Vec<ServiceDescriptor>, ConfigLoadError> {
    let document: CatalogDocument =
        serde_json::from_str(contents).map_err(|e| ConfigLoadError::Parse {
            origin: origin.to_string(),
            source: e,
        })?;
    let services = match document {
        CatalogDocument::List(services) => services,
        CatalogDocument::Wrapped { services } => services,
    };

    let mut seen = HashSet::new();
    for service in &services {
        if !seen.insert(service.id.as_str()) {
            return Err(ConfigLoadError::DuplicateId(service.id.clone()));
        }
    }
    Ok(services)
}

pub fn example_catalog() -> Result<Vec<ServiceDescriptor>, ConfigLoadError> {
    parse_catalog(EXAMPLE_CATALOG, "built-in example catalog")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env_store::EnvSnapshot;
    use std::io::Write;

    const TWO_SERVICES: &str = r#"[
        { "id": "a", "name": "A", "type": "REST", "url": "https://a.example" },
        { "id": "b", "name": "B", "type": "SOAP", "url": "https://b.example" }
    ]"#;

    #[test]
    fn test_load_catalog_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_SERVICES.as_bytes()).unwrap();

        let services = load_catalog(Some(file.path()), &EnvSnapshot::default()).unwrap();
        let ids: Vec<_> = services.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn test_env_var_overrides_default_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "services": {TWO_SERVICES} }}"#).unwrap();
        let env: EnvSnapshot = [(CATALOG_PATH_ENV, file.path().to_str().unwrap())]
            .into_iter()
            .collect();

        let services = load_catalog(None, &env).unwrap();
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn test_missing_requested_path_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        let err = load_catalog(Some(&missing), &EnvSnapshot::default()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_missing_default_falls_back_to_example_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("services.json");

        let services = load_catalog_from(&default, None, &EnvSnapshot::default()).unwrap();
        assert_eq!(services, example_catalog().unwrap());
    }

    #[test]
    fn test_existing_default_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let default = dir.path().join("services.json");
        std::fs::write(&default, TWO_SERVICES).unwrap();

        let services = load_catalog_from(&default, None, &EnvSnapshot::default()).unwrap();
        assert_eq!(services.len(), 2);
    }

    #[test]
    fn test_missing_env_var_target_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("from-env.json");
        let env: EnvSnapshot = [(CATALOG_PATH_ENV, missing.to_str().unwrap())]
            .into_iter()
            .collect();

        // The default file exists, but the env var target wins and is missing.
        let default = dir.path().join("services.json");
        std::fs::write(&default, TWO_SERVICES).unwrap();

        let err = load_catalog_from(&default, None, &env).unwrap_err();
        assert!(matches!(err, ConfigLoadError::NotFound(path) if path == missing));
    }

    #[test]
    fn test_unparsable_catalog_is_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();
        let err = load_catalog(Some(file.path()), &EnvSnapshot::default()).unwrap_err();
        assert!(matches!(err, ConfigLoadError::Parse { .. }));
    }

    #[test]
    fn test_duplicate_ids_are_rejected() {
        let contents = r#"[
            { "id": "a", "name": "A", "type": "REST" },
            { "id": "a", "name": "A again", "type": "REST" }
        ]"#;
        let err = parse_catalog(contents, "inline").unwrap_err();
        assert!(matches!(err, ConfigLoadError::DuplicateId(id) if id == "a"));
    }

    #[test]
    fn test_example_catalog_parses() {
        let services = example_catalog().unwrap();
        assert!(services.len() >= 3);
        assert!(services.iter().any(|s| s.id == "number-conversion"));
    }
}
