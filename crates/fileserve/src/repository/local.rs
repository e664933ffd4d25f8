//! Repository backed by a directory on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{FileRepository, RepositoryError, RepositoryResult};
use crate::types::FileMetadata;

/// Serves the regular files found directly inside a root directory.
///
/// Subdirectories are not listed and cannot be fetched. Names are joined onto
/// the root as given; callers that accept untrusted names are responsible for
/// rejecting traversal sequences before they reach this type.
#[derive(Debug, Clone)]
pub struct LocalFileRepository {
    root: PathBuf,
}

impl LocalFileRepository {
    /// Create a repository rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory this repository serves from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

#[async_trait]
impl FileRepository for LocalFileRepository {
    async fn list(&self) -> RepositoryResult<Vec<String>> {
        let root_name = self.root.display().to_string();
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| RepositoryError::from_io(&root_name, e))?;

        let mut files = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| RepositoryError::from_io(&root_name, e))?
        {
            let file_type = entry
                .file_type()
                .await
                .map_err(|e| RepositoryError::from_io(&root_name, e))?;
            if file_type.is_dir() {
                continue;
            }
            match entry.file_name().into_string() {
                Ok(name) => files.push(name),
                Err(raw) => {
                    tracing::warn!("Skipping non UTF-8 file name {:?}", raw);
                }
            }
        }

        Ok(files)
    }

    async fn stat(&self, name: &str) -> RepositoryResult<FileMetadata> {
        let metadata = tokio::fs::metadata(self.path_for(name))
            .await
            .map_err(|e| RepositoryError::from_io(name, e))?;
        if metadata.is_dir() {
            return Err(RepositoryError::NotFound(name.to_string()));
        }
        Ok(FileMetadata::new(name, metadata.len()))
    }

    async fn read(&self, name: &str) -> RepositoryResult<Vec<u8>> {
        let path = self.path_for(name);
        if tokio::fs::metadata(&path)
            .await
            .map_err(|e| RepositoryError::from_io(name, e))?
            .is_dir()
        {
            return Err(RepositoryError::NotFound(name.to_string()));
        }
        tokio::fs::read(&path)
            .await
            .map_err(|e| RepositoryError::from_io(name, e))
    }
}
