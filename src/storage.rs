//! Blob-storage collaborator for service-document attachments.
//!
//! The scheduler only depends on the [`BlobStore`] trait; the filesystem
//! implementation stands in for the hosted store and serves the files back
//! through the documents route.

use async_trait::async_trait;
use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("blob write failed: {0}")]
    Write(#[from] std::io::Error),
    #[error("invalid blob name: {0}")]
    InvalidName(String),
}

/// `upload` must complete before any database row referencing the blob is
/// written; callers treat a failure here as fatal for the whole operation.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, name: &str, data: Bytes, content_type: &str)
        -> Result<String, BlobError>;
}

/// Stores blobs under a local directory and returns URLs beneath the
/// configured public base.
pub struct FsBlobStore {
    root: PathBuf,
    base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn upload(
        &self,
        name: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<String, BlobError> {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(BlobError::InvalidName(name.to_string()));
        }

        // Prefix with a uuid so repeated uploads of the same file name never
        // overwrite an earlier attachment.
        let stored_name = format!("{}-{}", Uuid::new_v4(), name);
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.root.join(&stored_name);
        tokio::fs::write(&path, &data).await?;

        info!(
            name = %stored_name,
            content_type = %content_type,
            size = data.len(),
            "stored service document blob"
        );

        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            stored_name
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn upload_writes_file_and_returns_url() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost:8080/documents/");

        let url = store
            .upload("report.pdf", Bytes::from_static(b"%PDF-"), "application/pdf")
            .await
            .unwrap();

        assert!(url.starts_with("http://localhost:8080/documents/"));
        assert!(url.ends_with("-report.pdf"));

        let stored = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(stored, 1);
    }

    #[tokio::test]
    async fn upload_rejects_path_traversal_names() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost/documents");

        let err = store
            .upload("../escape.pdf", Bytes::new(), "application/pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, BlobError::InvalidName(_)));
    }

    #[tokio::test]
    async fn same_name_uploads_do_not_collide() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsBlobStore::new(dir.path(), "http://localhost/documents");

        let a = store
            .upload("scan.jpg", Bytes::from_static(b"a"), "image/jpeg")
            .await
            .unwrap();
        let b = store
            .upload("scan.jpg", Bytes::from_static(b"b"), "image/jpeg")
            .await
            .unwrap();
        assert_ne!(a, b);
    }
}
