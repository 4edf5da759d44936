//! Local filesystem storage for payment proofs

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::booking::{AssetStore, StoreError};

/// Writes uploaded proofs as `proof_<uuid>.<ext>` under a root directory
#[derive(Debug, Clone)]
pub struct LocalAssetStore {
    root: PathBuf,
}

impl LocalAssetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn extension(file_name: &str) -> String {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.len() <= 8 && ext.chars().all(|c| c.is_ascii_alphanumeric()))
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string())
    }

    fn resolve(&self, reference: &str) -> Result<PathBuf, StoreError> {
        if reference.is_empty() || reference.contains(['/', '\\']) || reference.starts_with('.') {
            return Err(StoreError::Backend(format!("invalid asset reference: {}", reference)));
        }
        Ok(self.root.join(reference))
    }
}

#[async_trait]
impl AssetStore for LocalAssetStore {
    async fn store(&self, file_name: &str, bytes: &[u8]) -> Result<String, StoreError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let reference = format!("proof_{}.{}", Uuid::new_v4(), Self::extension(file_name));
        tokio::fs::write(self.root.join(&reference), bytes)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::debug!(%reference, size = bytes.len(), "Payment proof stored");
        Ok(reference)
    }

    async fn remove(&self, reference: &str) -> Result<(), StoreError> {
        let path = self.resolve(reference)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::Backend(e.to_string())),
        }
    }
}
