use std::path::{Path, PathBuf};

use chrono::Utc;
use tokio::fs;
use uuid::Uuid;

use crate::errors::ServiceError;

/// Disk-backed store for payment-evidence artifacts.
///
/// Keys are generated server-side as `<unix-millis>-<uuid>.<ext>`; the
/// client-supplied filename never reaches the filesystem, so hostile names
/// cannot traverse or collide.
#[derive(Debug, Clone)]
pub struct UploadStore {
    root: PathBuf,
}

/// Reference to an artifact accepted onto durable storage.
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub key: String,
    /// Path under which the artifact is publicly served.
    pub public_path: String,
}

impl UploadStore {
    /// URL prefix under which artifacts are served.
    pub const PUBLIC_PREFIX: &'static str = "/uploads";

    pub async fn new<P: Into<PathBuf>>(root: P) -> Result<Self, ServiceError> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            ServiceError::Storage(format!("cannot create upload dir {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn next_key(extension: &str) -> String {
        format!(
            "{}-{}.{}",
            Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            extension
        )
    }

    /// Write an artifact and return its key and public path.
    pub async fn save(&self, bytes: &[u8], extension: &str) -> Result<StoredArtifact, ServiceError> {
        let key = Self::next_key(extension);
        let path = self.root.join(&key);
        fs::write(&path, bytes)
            .await
            .map_err(|e| ServiceError::Storage(format!("cannot write artifact {key}: {e}")))?;
        Ok(StoredArtifact {
            public_path: format!("{}/{}", Self::PUBLIC_PREFIX, key),
            key,
        })
    }

    /// Remove an artifact; returns whether it existed.
    pub async fn remove(&self, key: &str) -> Result<bool, ServiceError> {
        match fs::remove_file(self.root.join(key)).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(ServiceError::Storage(format!(
                "cannot remove artifact {key}: {e}"
            ))),
        }
    }
}
