//! services/api/src/adapters/file_slot.rs
//!
//! A `ProjectRepository` that keeps the project blob in a JSON file named
//! after the storage key.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thought_partner_core::domain::Project;
use thought_partner_core::ports::{PortError, PortResult, ProjectRepository};
use tracing::debug;

use crate::adapters::records::{decode_project, encode_project};

/// Stores the project at `<dir>/<key>.json`.
#[derive(Clone, Debug)]
pub struct FileSlotAdapter {
    path: PathBuf,
}

impl FileSlotAdapter {
    pub fn new(dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProjectRepository for FileSlotAdapter {
    async fn load(&self) -> PortResult<Option<Project>> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(blob) => decode_project(&blob).map(Some),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(PortError::Unexpected(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Writes to a sibling temp file first so a crash never leaves a half-written slot.
    async fn save(&self, project: &Project) -> PortResult<()> {
        let blob = encode_project(project)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        }

        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, blob)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        debug!("Saved project {} to {}.", project.id, self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use thought_partner_core::domain::{ItemKind, Point};
    use thought_partner_core::store::ProjectStore;

    #[tokio::test]
    async fn missing_file_loads_as_empty_slot() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = FileSlotAdapter::new(dir.path(), "thought-partner-project");
        assert!(adapter.load().await.expect("load").is_none());
    }

    #[tokio::test]
    async fn store_mutations_survive_a_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = Arc::new(FileSlotAdapter::new(dir.path().join("nested"), "board"));

        let mut store = ProjectStore::open(adapter.clone()).await;
        let id = store
            .add_blank_item(ItemKind::Sticky, Point::new(400.0, 300.0))
            .await;
        let project = store.project().clone();

        let reopened = ProjectStore::open(adapter.clone()).await;
        assert_eq!(reopened.project(), &project);
        assert!(reopened.item(id).is_some());
        assert!(adapter.path().ends_with("nested/board.json"));
    }

    #[tokio::test]
    async fn corrupt_file_is_reported_as_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let adapter = FileSlotAdapter::new(dir.path(), "board");
        std::fs::write(adapter.path(), "{ not json").expect("write");
        assert!(adapter.load().await.is_err());
    }
}
