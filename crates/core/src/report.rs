use std::path::{Path, PathBuf};
use svcprobe_common::BatchResult;
use tracing::info;

/// File name for a batch report, e.g. `health-check-UAT-20240101T120000.000Z.json`.
pub fn report_file_name(batch: &BatchResult) -> String {
    format!(
        "health-check-{}-{}.json",
        batch.environment,
        batch.timestamp.format("%Y%m%dT%H%M%S%.3fZ")
    )
}

/// Writes the batch as pretty JSON into `dir`, creating it if needed.
pub async fn write_batch_report(dir: &Path, batch: &BatchResult) -> std::io::Result<PathBuf> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(report_file_name(batch));
    let contents = serde_json::to_vec_pretty(batch)?;
    tokio::fs::write(&path, contents).await?;
    info!(path = ?path, "Wrote health check report.");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use svcprobe_common::Environment;

    #[tokio::test]
    async fn test_report_is_written_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let batch = BatchResult::new(Environment::Uat, Vec::new());

        let path = write_batch_report(&dir.path().join("reports"), &batch).await.unwrap();
        assert!(path.file_name().unwrap().to_str().unwrap().starts_with("health-check-UAT-"));

        let written: BatchResult = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(written, batch);
    }
}
