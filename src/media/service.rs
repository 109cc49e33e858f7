//! Async facade over the blocking media store.
//!
//! Store calls do plain filesystem I/O, so the service moves each one onto
//! tokio's blocking thread pool before awaiting it.

use std::sync::Arc;

use report_media_common::{Error, ReportKey, Result};

use super::storage::{MediaStore, RetrievedMedia, UploadedFile};
use crate::config::StorageConfig;

/// Shared handle used by the HTTP layer to reach the media store.
#[derive(Debug, Clone)]
pub struct MediaService {
    store: Arc<MediaStore>,
}

impl MediaService {
    /// Create a new `MediaService` around an already configured store.
    pub fn new(store: MediaStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Build the service from the `[storage]` config section.
    pub fn from_config(config: &StorageConfig) -> Result<Self> {
        let store = MediaStore::new(&config.base_dir, config.root_label.clone())?;
        tracing::info!(
            root = %store.root().display(),
            "Media store ready"
        );
        Ok(Self::new(store))
    }

    /// The underlying store.
    pub fn store(&self) -> &MediaStore {
        &self.store
    }

    /// Ingest a batch of uploads for a report.
    ///
    /// See [`MediaStore::ingest`] for naming and failure semantics.
    pub async fn ingest(
        &self,
        report_key: ReportKey,
        files: Vec<UploadedFile>,
    ) -> Result<Vec<String>> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.ingest(&report_key, &files))
            .await
            .map_err(|e| Error::internal(format!("ingest task failed: {e}")))?
    }

    /// Retrieve a stored file by relative path.
    ///
    /// See [`MediaStore::retrieve`] for path validation rules.
    pub async fn retrieve(&self, relative_path: String) -> Result<RetrievedMedia> {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || store.retrieve(&relative_path))
            .await
            .map_err(|e| Error::internal(format!("retrieve task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_service_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let service = MediaService::new(MediaStore::new(dir.path(), "Images").unwrap());

        let paths = service
            .ingest(
                ReportKey::parse("r5").unwrap(),
                vec![UploadedFile::new("wall.webp", &b"RIFF"[..])],
            )
            .await
            .unwrap();
        assert_eq!(paths, vec!["Images/r5/wall.webp"]);

        let media = service.retrieve(paths[0].clone()).await.unwrap();
        assert_eq!(media.data, b"RIFF");
        assert_eq!(media.content_type, "image/webp");
    }

    #[test]
    fn test_from_config() {
        let config = StorageConfig {
            base_dir: "/srv/public".into(),
            root_label: "Photos".into(),
        };
        let service = MediaService::from_config(&config).unwrap();
        assert_eq!(service.store().root_label(), "Photos");
        assert_eq!(
            service.store().root(),
            std::path::PathBuf::from("/srv/public/Photos")
        );
    }

    #[tokio::test]
    async fn test_service_propagates_store_errors() {
        let dir = tempfile::tempdir().unwrap();
        let service = MediaService::new(MediaStore::new(dir.path(), "Images").unwrap());

        let err = service
            .retrieve("Images/../etc/passwd".to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath(_)));
    }
}
