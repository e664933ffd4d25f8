//! Fileserve core
//!
//! Storage-facing half of the fileserve RPC service: the domain types handed
//! across the wire, the [`FileRepository`] capability that backs them, and the
//! [`FileUsecase`] layer that RPC handlers call into.
//!
//! # Architecture
//!
//! ```text
//! RPC handler ──> FileUsecase ──> dyn FileRepository
//!                                   ├── LocalFileRepository (directory on disk)
//!                                   └── MemoryRepository    (in-process map)
//! ```
//!
//! Handlers never talk to a repository directly. The usecase is the one place
//! where cross-repository behaviour (caching, multiplexing) would be added.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fileserve::{FileUsecase, LocalFileRepository};
//!
//! # async fn example() -> Result<(), fileserve::RepositoryError> {
//! let usecase = FileUsecase::new(Arc::new(LocalFileRepository::new("/srv/files")));
//! for name in usecase.list_files().await? {
//!     let info = usecase.file_info(&name).await?;
//!     println!("{} ({} bytes)", info.filename, info.size);
//! }
//! # Ok(())
//! # }
//! ```

mod repository;
mod types;
mod usecase;

pub use repository::{
    FileRepository, LocalFileRepository, MemoryRepository, RepositoryError, RepositoryResult,
};
pub use types::{FileContent, FileMetadata};
pub use usecase::FileUsecase;
