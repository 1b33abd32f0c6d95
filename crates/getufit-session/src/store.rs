use std::path::{Path, PathBuf};

use async_trait::async_trait;
use getufit_core::SessionRecord;
use tokio::fs;
use tracing::{debug, info, warn};

use crate::error::{StoreError, StoreResult};

const SLOT_FILE: &str = "session.json";

/// Single-slot persistence for the onboarding result.
///
/// `read` returns `None` when no record has ever been written (or after
/// `clear`); `write` fully replaces any prior record. Only the onboarding
/// flow writes, so last-write-wins is sufficient.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the persisted record, if any
    async fn read(&self) -> StoreResult<Option<SessionRecord>>;

    /// Persist a record, replacing any prior value
    async fn write(&self, record: &SessionRecord) -> StoreResult<()>;

    /// Remove the persisted record
    async fn clear(&self) -> StoreResult<()>;
}

/// File-backed store keeping the record as pretty-printed JSON
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    base_path: PathBuf,
}

impl FileSessionStore {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Path of the slot file
    pub fn slot_path(&self) -> PathBuf {
        self.base_path.join(SLOT_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path.join(format!("{}.tmp", SLOT_FILE))
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn read(&self) -> StoreResult<Option<SessionRecord>> {
        let path = self.slot_path();
        if !path.exists() {
            debug!("No session record at {:?}", path);
            return Ok(None);
        }

        let content = fs::read_to_string(&path).await?;
        match serde_json::from_str(&content) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // A half-written or hand-edited slot must not wedge the
                // client; treat it as absent and let onboarding rewrite it.
                warn!("Discarding unreadable session record at {:?}: {}", path, e);
                Ok(None)
            }
        }
    }

    async fn write(&self, record: &SessionRecord) -> StoreResult<()> {
        ensure_dir(&self.base_path).await?;

        let content = serde_json::to_string_pretty(record)?;
        let temp = self.temp_path();
        fs::write(&temp, &content).await?;
        fs::rename(&temp, self.slot_path()).await?;

        info!("Session record persisted for user {}", record.user_id());
        Ok(())
    }

    async fn clear(&self) -> StoreResult<()> {
        let path = self.slot_path();
        if path.exists() {
            fs::remove_file(&path).await?;
            info!("Session record cleared");
        }
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> StoreResult<()> {
    if path.exists() && !path.is_dir() {
        return Err(StoreError::invalid_path(format!(
            "{:?} exists and is not a directory",
            path
        )));
    }
    fs::create_dir_all(path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample_record() -> SessionRecord {
        serde_json::from_value(serde_json::json!({
            "message": "User onboarded successfully",
            "user_data": { "user_id": "u-42", "name": "Sam" }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_read_absent_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_write_then_read_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        let record = sample_record();
        store.write(&record).await.unwrap();

        let loaded = store.read().await.unwrap().unwrap();
        assert_eq!(loaded, record);
        assert_eq!(loaded.user_id(), "u-42");
    }

    #[tokio::test]
    async fn test_write_replaces_prior_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        store.write(&sample_record()).await.unwrap();

        let replacement: SessionRecord = serde_json::from_value(serde_json::json!({
            "user_data": { "user_id": "u-99" }
        }))
        .unwrap();
        store.write(&replacement).await.unwrap();

        let loaded = store.read().await.unwrap().unwrap();
        assert_eq!(loaded.user_id(), "u-99");
        assert!(loaded.extra.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_slot_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        tokio::fs::write(store.slot_path(), "{not json").await.unwrap();
        assert!(store.read().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_slot() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileSessionStore::new(temp_dir.path());

        store.write(&sample_record()).await.unwrap();
        store.clear().await.unwrap();
        assert!(store.read().await.unwrap().is_none());

        // Clearing an already-empty store is fine.
        store.clear().await.unwrap();
    }
}
