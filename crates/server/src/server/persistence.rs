use std::path::Path;
use svcprobe_common::BatchResult;
use svcprobe_core::report::write_batch_report;
use tracing::{error, info};

use crate::server::config::ServerConfig;

/// Writes the batch into `results_dir` when one is configured. Failures are logged, never returned.
pub async fn persist_batch(config: &ServerConfig, batch: &BatchResult) {
    let Some(dir) = &config.results_dir else {
        return;
    };
    match write_batch_report(Path::new(dir), batch).await {
        Ok(path) => info!(path = ?path, "Persisted health check batch."),
        Err(e) => error!(error = %e, dir = %dir, "Failed to persist health check batch."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_batch_writes_into_results_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = ServerConfig {
            results_dir: Some(dir.path().to_string_lossy().into_owned()),
            ..ServerConfig::default()
        };
        let batch = BatchResult::new(svcprobe_common::Environment::Qa, Vec::new());
        persist_batch(&config, &batch).await;

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_persist_batch_without_dir_is_noop() {
        let config = ServerConfig::default();
        let batch = BatchResult::new(svcprobe_common::Environment::Dev, Vec::new());
        persist_batch(&config, &batch).await;
    }
}
