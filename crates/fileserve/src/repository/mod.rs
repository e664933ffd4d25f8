//! Storage capability backing the file service.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::FileMetadata;

mod local;
mod memory;

pub use local::LocalFileRepository;
pub use memory::MemoryRepository;

/// Errors returned by a [`FileRepository`].
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The named file does not exist
    #[error("file not found: {0}")]
    NotFound(String),
    /// Any other storage failure
    #[error("IO error on {name}: {source}")]
    Io {
        /// File (or directory) the operation was acting on
        name: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl RepositoryError {
    /// Classify an IO error for `name`, keeping "missing" distinct from other failures.
    pub fn from_io(name: impl Into<String>, source: std::io::Error) -> Self {
        let name = name.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(name)
        } else {
            Self::Io { name, source }
        }
    }

    /// Whether this error means the file does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Result alias for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Read-only access to a set of named files.
///
/// Implementations must be safe for concurrent use: the server calls them from
/// many in-flight requests at once.
#[async_trait]
pub trait FileRepository: Send + Sync {
    /// List the names of all files, in whatever order the storage yields them.
    async fn list(&self) -> RepositoryResult<Vec<String>>;

    /// Look up metadata for a file.
    async fn stat(&self, name: &str) -> RepositoryResult<FileMetadata>;

    /// Read the full content of a file.
    async fn read(&self, name: &str) -> RepositoryResult<Vec<u8>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_io_error_is_classified() {
        let err = RepositoryError::from_io(
            "missing.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "file not found: missing.txt");
    }

    #[test]
    fn test_other_io_error_stays_io() {
        let err = RepositoryError::from_io(
            "locked.txt",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!err.is_not_found());
        assert!(matches!(err, RepositoryError::Io { ref name, .. } if name == "locked.txt"));
    }
}
