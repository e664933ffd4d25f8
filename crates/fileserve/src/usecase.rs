//! Usecase layer between the RPC handlers and storage.

use std::sync::Arc;

use crate::repository::{FileRepository, RepositoryResult};
use crate::types::FileMetadata;

/// File operations exposed to the RPC layer.
///
/// Every operation forwards to the repository and returns its result
/// unchanged.
#[derive(Clone)]
pub struct FileUsecase {
    repository: Arc<dyn FileRepository>,
}

impl std::fmt::Debug for FileUsecase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileUsecase").finish_non_exhaustive()
    }
}

impl FileUsecase {
    /// Create a usecase over the given repository.
    pub fn new(repository: Arc<dyn FileRepository>) -> Self {
        Self { repository }
    }

    /// List all file names.
    pub async fn list_files(&self) -> RepositoryResult<Vec<String>> {
        self.repository.list().await
    }

    /// Look up metadata for `filename`.
    pub async fn file_info(&self, filename: &str) -> RepositoryResult<FileMetadata> {
        self.repository.stat(filename).await
    }

    /// Read the content of `filename`.
    pub async fn file_content(&self, filename: &str) -> RepositoryResult<Vec<u8>> {
        self.repository.read(filename).await
    }
}
