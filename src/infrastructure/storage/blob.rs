//! Filesystem implementation of BlobStorage
//!
//! Objects live at `<root>/<bucket>/<path>` and are served from
//! `<public_base_url>/<bucket>/<path>`.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use crate::domain::{BlobStorage, DomainError};

pub struct FsBlobStorage {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    fn object_path(&self, bucket: &str, path: &str) -> Result<PathBuf, DomainError> {
        for segment in [bucket, path] {
            let relative = Path::new(segment);
            let only_normal = relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
            if segment.is_empty() || !only_normal {
                return Err(DomainError::Validation(format!(
                    "Invalid storage path '{}'",
                    segment
                )));
            }
        }
        Ok(self.root.join(bucket).join(path))
    }

    pub fn public_url(&self, bucket: &str, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.public_base_url.trim_end_matches('/'),
            bucket,
            path
        )
    }
}

#[async_trait]
impl BlobStorage for FsBlobStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        bytes: &[u8],
        content_type: &str,
    ) -> Result<String, DomainError> {
        let target = self.object_path(bucket, path)?;
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;

        tracing::debug!(
            "Stored {} bytes ({}) at {}/{}",
            bytes.len(),
            content_type,
            bucket,
            path
        );
        Ok(self.public_url(bucket, path))
    }

    async fn remove(&self, bucket: &str, path: &str) -> Result<(), DomainError> {
        let target = self.object_path(bucket, path)?;
        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(DomainError::NotFound),
            Err(e) => Err(e.into()),
        }
    }
}
