//! File-based fixture store.
//!
//! Keeps the curated program list as pretty-printed JSON:
//!
//! ```text
//! {
//!   "programs": [ { "title": ..., "applicationPeriod": ..., ... } ],
//!   "lastUpdated": "2025-09-10T00:00:00Z",
//!   "source": "manual_update"
//! }
//! ```
//!
//! A missing file is not an error; the built-in baseline is returned until
//! the first save.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, instrument};

use yiyf_core::error::{Result, YiyfError};
use yiyf_core::traits::FixtureStore;
use yiyf_core::types::FixtureData;

use crate::defaults::default_fixture;

/// File-based fixture store.
#[derive(Clone, Debug)]
pub struct FileFixtureStore {
    /// Path to the JSON file
    path: PathBuf,
}

impl FileFixtureStore {
    /// Creates a store backed by `path`. Nothing is read until [`FixtureStore::load`].
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FixtureStore for FileFixtureStore {
    #[instrument(skip(self), fields(path = ?self.path))]
    async fn load(&self) -> Result<FixtureData> {
        let contents = match fs::read(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("Fixture file missing, using built-in programs");
                return Ok(default_fixture());
            }
            Err(e) => {
                return Err(YiyfError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to open fixture file: {}", e),
                )))
            }
        };

        let data: FixtureData = serde_json::from_slice(&contents)
            .map_err(|e| YiyfError::FixtureError(format!("malformed fixture file: {}", e)))?;

        debug!(count = data.len(), source = %data.source, "Fixture file loaded");
        Ok(data)
    }

    #[instrument(skip(self, data), fields(path = ?self.path, count = data.len()))]
    async fn save(&self, data: &FixtureData) -> Result<()> {
        let serialized = serde_json::to_vec_pretty(data)?;

        // Write atomically (write to temp, then rename)
        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(&serialized).await?;
        file.sync_all().await?;

        fs::rename(&temp_path, &self.path).await?;

        info!("Fixture file saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::tempdir;
    use tokio_test::{assert_err, assert_ok};
    use yiyf_core::types::ProgramRecord;

    fn manual(titles: &[&str]) -> FixtureData {
        FixtureData::manual_update(
            titles.iter().map(|t| ProgramRecord::new(*t)).collect(),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_missing_file_loads_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs-data.json");

        let store = FileFixtureStore::new(&path);
        let data = assert_ok!(store.load().await);

        assert_eq!(data, default_fixture());
        assert!(!path.exists()); // File not created until save
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs-data.json");

        {
            let store = FileFixtureStore::new(&path);
            assert_ok!(store.save(&manual(&["새 프로그램 1", "새 프로그램 2"])).await);
        }

        {
            let store = FileFixtureStore::new(&path);
            let data = assert_ok!(store.load().await);
            assert_eq!(data.len(), 2);
            assert_eq!(data.source, "manual_update");
            assert_eq!(data.programs[1].title, "새 프로그램 2");
        }
    }

    #[tokio::test]
    async fn test_file_uses_camel_case_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs-data.json");

        let store = FileFixtureStore::new(&path);
        assert_ok!(store.save(&manual(&["새 프로그램"])).await);

        let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).await.unwrap()).unwrap();
        assert!(raw.get("lastUpdated").is_some());
        assert!(raw["programs"][0].get("applicationPeriod").is_some());
    }

    #[tokio::test]
    async fn test_hand_written_file_is_accepted() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs-data.json");
        fs::write(
            &path,
            r#"{
                "programs": [
                    { "title": "처인성어울림센터 아트살롱 1회차 활동",
                      "applicationPeriod": "2025-08-12 ~ 2025-08-19",
                      "participationPeriod": "2025-09-06 ~ 2025-09-06",
                      "link": "https://www.yiyf.or.kr" }
                ],
                "lastUpdated": "2025-09-10T09:00:00.000Z",
                "source": "manual"
            }"#,
        )
        .await
        .unwrap();

        let data = assert_ok!(FileFixtureStore::new(&path).load().await);
        assert_eq!(data.len(), 1);
        assert_eq!(data.source, "manual");
    }

    #[tokio::test]
    async fn test_invalid_file_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs-data.json");
        fs::write(&path, b"invalid data").await.unwrap();

        let err = assert_err!(FileFixtureStore::new(&path).load().await);
        assert!(matches!(err, YiyfError::FixtureError(_)));
    }

    #[tokio::test]
    async fn test_atomic_save() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("programs-data.json");
        let temp_path = path.with_extension("tmp");

        let store = FileFixtureStore::new(&path);
        assert_ok!(store.save(&manual(&["새 프로그램"])).await);

        // Temp file should not exist after save
        assert!(!temp_path.exists());
        assert!(path.exists());
    }
}
