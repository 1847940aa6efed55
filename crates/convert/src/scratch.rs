//! Per-request scratch directories.
//!
//! Each conversion gets `<root>/<uuid>/`. The directory is removed after a
//! successful conversion and kept after a failure so the tool output and
//! scheduler logs can be inspected.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::ConvertError;

#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    /// Create a fresh, uniquely named directory under `root`.
    pub async fn create(root: &Path) -> Result<Self, ConvertError> {
        let path = root.join(Uuid::new_v4().to_string());
        tokio::fs::create_dir_all(&path).await?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }

    /// Write `contents` to `name` inside the directory.
    pub async fn write(&self, name: &str, contents: &[u8]) -> Result<PathBuf, ConvertError> {
        let path = self.join(name);
        tokio::fs::write(&path, contents).await?;
        Ok(path)
    }

    /// Apply the retention policy for `result`: remove on success, keep on
    /// failure.
    pub async fn finish<T>(self, result: &Result<T, ConvertError>) {
        match result {
            Ok(_) => {
                if let Err(e) = tokio::fs::remove_dir_all(&self.path).await {
                    tracing::warn!(dir = %self.path.display(), error = %e, "Failed to remove scratch dir");
                }
            }
            Err(err) => {
                tracing::warn!(dir = %self.path.display(), error = %err, "Conversion failed, scratch dir kept");
            }
        }
    }
}
