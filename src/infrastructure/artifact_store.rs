use crate::domain::artifact::ExportArtifact;
use crate::domain::error::{AppError, Result};
use crate::domain::test_case::TestCaseBatch;
use crate::infrastructure::csv::{CsvExporter, CsvParser};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

fn io_err(msg: impl Into<String>) -> AppError {
    AppError::IoError(msg.into())
}

/// Owner of the shared export file.
///
/// Each publish renders its own bytes in memory, so callers never need to
/// read the shared file back. Writes and reads of the shared path are
/// serialized by `lock`, and a write only becomes visible through an atomic
/// rename.
pub struct ArtifactStore {
    path: PathBuf,
    file_name: String,
    exporter: CsvExporter,
    lock: Mutex<()>,
}

impl ArtifactStore {
    pub fn new(path: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            file_name: file_name.into(),
            exporter: CsvExporter::new(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn publish(&self, batch: &TestCaseBatch) -> Result<ExportArtifact> {
        let bytes = self.exporter.render(batch)?;
        let sha256 = sha256_hex(&bytes);

        let _guard = self.lock.lock().await;
        let path = self.path.clone();
        let data = bytes.clone();
        tokio::task::spawn_blocking(move || atomic_write_bytes(&path, &data))
            .await
            .map_err(|e| AppError::Internal(format!("Export task failed: {}", e)))??;

        Ok(ExportArtifact {
            file_name: self.file_name.clone(),
            path: self.path.clone(),
            bytes,
            rows: batch.len(),
            sha256,
        })
    }

    pub async fn latest(&self) -> Result<ExportArtifact> {
        let _guard = self.lock.lock().await;
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(AppError::NotFound(format!(
                    "No export at {}",
                    self.path.display()
                )));
            }
            Err(e) => {
                return Err(io_err(format!(
                    "Failed to read {}: {e}",
                    self.path.display()
                )))
            }
        };

        let text = String::from_utf8_lossy(&bytes);
        let rows = CsvParser::new().parse_content(&text)?.len();

        Ok(ExportArtifact {
            file_name: self.file_name.clone(),
            path: self.path.clone(),
            sha256: sha256_hex(&bytes),
            rows,
            bytes,
        })
    }
}

fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| io_err(format!("Failed to create dir {}: {e}", path.display())))?;
    Ok(())
}

/// Writes to a sibling temp file, then renames over `path`.
pub fn atomic_write_bytes(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        ensure_dir(parent)?;
    }

    let tmp_path = path.with_extension(format!("tmp-{}", Uuid::new_v4()));
    let written = (|| {
        let mut file = fs::File::create(&tmp_path).map_err(|e| {
            io_err(format!(
                "Failed to create temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.write_all(bytes).map_err(|e| {
            io_err(format!(
                "Failed to write temp file {}: {e}",
                tmp_path.display()
            ))
        })?;
        file.sync_all().ok();

        fs::rename(&tmp_path, path).map_err(|e| {
            io_err(format!(
                "Failed to rename temp file {} to {}: {e}",
                tmp_path.display(),
                path.display()
            ))
        })
    })();

    if written.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    written
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_case::TestCase;
    use std::sync::Arc;

    fn batch(ids: &[&str]) -> TestCaseBatch {
        TestCaseBatch::from(
            ids.iter()
                .map(|id| TestCase::new(*id, "desc", &["step".to_string()], "ok"))
                .collect::<Vec<_>>(),
        )
    }

    #[tokio::test]
    async fn test_publish_overwrites_previous_export() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("test_cases.csv"), "test_cases.csv");

        store.publish(&batch(&["TC001", "TC002", "TC003"])).await.unwrap();
        let artifact = store.publish(&batch(&["TC009"])).await.unwrap();

        let on_disk = fs::read(store.path()).unwrap();
        assert_eq!(on_disk, artifact.bytes);
        assert_eq!(artifact.rows, 1);
        assert_eq!(artifact.sha256, sha256_hex(&on_disk));
    }

    #[tokio::test]
    async fn test_publish_leaves_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("out.csv"), "out.csv");
        store.publish(&batch(&["TC001"])).await.unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("out.csv")]);
    }

    #[tokio::test]
    async fn test_latest_reports_missing_export() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path().join("missing.csv"), "missing.csv");
        assert!(matches!(store.latest().await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_concurrent_publishes_never_expose_mixed_files() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(ArtifactStore::new(dir.path().join("shared.csv"), "shared.csv"));

        let mut handles = Vec::new();
        for n in 0..8 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                let ids: Vec<String> = (0..=n).map(|i| format!("R{n}-TC{i}")).collect();
                let refs: Vec<&str> = ids.iter().map(String::as_str).collect();
                store.publish(&batch(&refs)).await.unwrap()
            }));
        }

        let mut published = Vec::new();
        for handle in handles {
            published.push(handle.await.unwrap());
        }

        let latest = store.latest().await.unwrap();
        assert!(published.iter().any(|a| a.bytes == latest.bytes));
        assert!(published.iter().any(|a| a.sha256 == latest.sha256));
    }

    #[tokio::test]
    async fn test_publish_into_unwritable_location_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not_a_dir");
        fs::write(&blocker, b"x").unwrap();
        let store = ArtifactStore::new(blocker.join("out.csv"), "out.csv");

        let err = store.publish(&batch(&["TC001"])).await.unwrap_err();
        assert!(matches!(err, AppError::IoError(_)));
    }
}
