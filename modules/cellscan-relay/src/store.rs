//! Scratch storage for in-flight uploads. One uniquely named file per
//! request; nothing here is ever read by another request or kept after
//! the response is sent.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::io::AsyncWriteExt;
use tracing::warn;
use uuid::Uuid;

pub struct TempStore {
    root: PathBuf,
}

/// Handle to one persisted upload. Owned by the request that created it;
/// dropping it deletes the file, so a cancelled request (client disconnect,
/// shutdown) still releases its artifact.
pub struct StoredArtifact {
    pub id: Uuid,
    pub path: PathBuf,
    pub file_name: String,
    pub content_type: String,
}

impl TempStore {
    /// Open the scratch directory, creating it if absent.
    pub fn new(root: impl Into<PathBuf>) -> std::io::Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persist bytes under a fresh `upload-<uuid>` name. `create_new` turns
    /// a (practically impossible) name collision into a hard error instead
    /// of silently overwriting another request's artifact.
    pub async fn put(
        &self,
        file_name: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> std::io::Result<StoredArtifact> {
        let id = Uuid::new_v4();
        let path = self.root.join(format!("upload-{id}"));

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await?;

        if let Err(e) = write_and_flush(&mut file, bytes).await {
            // Never leave a partial artifact behind.
            drop(file);
            let _ = tokio::fs::remove_file(&path).await;
            return Err(e);
        }

        Ok(StoredArtifact {
            id,
            path,
            file_name: file_name.to_string(),
            content_type: content_type.to_string(),
        })
    }

    /// Idempotent delete: an already-absent file counts as success, so
    /// racing cleanup paths never fail each other.
    pub async fn remove(&self, artifact: &StoredArtifact) -> std::io::Result<()> {
        match tokio::fs::remove_file(&artifact.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }
}

async fn write_and_flush(file: &mut tokio::fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await
}

impl Drop for StoredArtifact {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove temp artifact on drop"
                );
            }
        }
    }
}
