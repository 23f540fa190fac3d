//! Scoped temporary storage for a single merge request.
//!
//! Every merge gets one [`MergeWorkspace`]; uploaded bytes and intermediate
//! encode/decode products are written inside it and the whole directory is
//! removed when the workspace drops, whether the merge succeeded or failed.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::batch::UploadedFile;
use crate::error::{MediaCatError, Result};

/// A per-request temporary directory.
#[derive(Debug)]
pub struct MergeWorkspace {
    dir: TempDir,
}

impl MergeWorkspace {
    /// Create a fresh workspace directory.
    pub fn new() -> Result<Self> {
        let dir = TempDir::with_prefix("mediacat-")?;
        Ok(Self { dir })
    }

    /// Root path of the workspace.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write an uploaded file to disk inside the workspace.
    ///
    /// The on-disk name keeps the upload's extension (ffmpeg and friends
    /// key off it) but is otherwise synthetic, so hostile upload names
    /// cannot escape the directory.
    pub async fn persist_input(&self, index: usize, file: &UploadedFile) -> Result<PathBuf> {
        let ext = Path::new(&file.name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_else(|| "bin".to_string());

        let path = self.dir.path().join(format!("input_{index:03}.{ext}"));

        tokio::fs::write(&path, &file.bytes)
            .await
            .map_err(|e| MediaCatError::FailedToWrite {
                path: path.clone(),
                source: e,
            })?;

        Ok(path)
    }

    /// Path for an intermediate or output file inside the workspace.
    pub fn scratch_path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_persist_input_keeps_extension() {
        let workspace = MergeWorkspace::new().unwrap();
        let file = UploadedFile::new("My Song (final).MP3", vec![1, 2, 3]);

        let path = workspace.persist_input(0, &file).await.unwrap();

        assert_eq!(path.file_name().unwrap(), "input_000.mp3");
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3]);
        assert!(path.starts_with(workspace.path()));
    }

    #[tokio::test]
    async fn test_persist_input_without_extension() {
        let workspace = MergeWorkspace::new().unwrap();
        let file = UploadedFile::new("raw-upload", vec![9]);

        let path = workspace.persist_input(3, &file).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "input_003.bin");
    }

    #[tokio::test]
    async fn test_workspace_removed_on_drop() {
        let root;
        {
            let workspace = MergeWorkspace::new().unwrap();
            root = workspace.path().to_path_buf();
            let file = UploadedFile::new("a.txt", b"hello".to_vec());
            workspace.persist_input(0, &file).await.unwrap();
            assert!(root.exists());
        }
        assert!(!root.exists());
    }
}
