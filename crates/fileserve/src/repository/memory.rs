//! In-process repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{FileRepository, RepositoryError, RepositoryResult};
use crate::types::FileMetadata;

/// Repository holding its files in memory.
///
/// Listing order is the lexical order of file names.
#[derive(Debug, Default)]
pub struct MemoryRepository {
    files: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a repository pre-populated with `files`.
    pub fn with_files<I, N, C>(files: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<Vec<u8>>,
    {
        Self {
            files: RwLock::new(
                files
                    .into_iter()
                    .map(|(name, content)| (name.into(), content.into()))
                    .collect(),
            ),
        }
    }

    /// Insert or replace a file.
    pub async fn insert(&self, name: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.write().await.insert(name.into(), content.into());
    }

    /// Remove a file, returning whether it existed.
    pub async fn remove(&self, name: &str) -> bool {
        self.files.write().await.remove(name).is_some()
    }
}

#[async_trait]
impl FileRepository for MemoryRepository {
    async fn list(&self) -> RepositoryResult<Vec<String>> {
        Ok(self.files.read().await.keys().cloned().collect())
    }

    async fn stat(&self, name: &str) -> RepositoryResult<FileMetadata> {
        self.files
            .read()
            .await
            .get(name)
            .map(|data| FileMetadata::new(name, data.len() as u64))
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }

    async fn read(&self, name: &str) -> RepositoryResult<Vec<u8>> {
        self.files
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[tokio::test]
    async fn test_insert_and_remove() {
        let repo = MemoryRepository::new();
        repo.insert("x.txt", "hello").await;

        assert_eq!(repo.list().await.unwrap(), vec!["x.txt".to_string()]);
        assert_eq!(repo.stat("x.txt").await.unwrap().size, 5);
        assert_eq!(repo.read("x.txt").await.unwrap(), b"hello");

        assert!(repo.remove("x.txt").await);
        assert!(!repo.remove("x.txt").await);
        assert!(repo.read("x.txt").await.unwrap_err().is_not_found());
    }
}
