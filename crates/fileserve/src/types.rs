//! Values exchanged between the repository, the usecase and the RPC layer.

use serde::Serialize;

/// Metadata for a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMetadata {
    /// Name the file was looked up by
    pub filename: String,
    /// File size in bytes
    pub size: u64,
}

impl FileMetadata {
    /// Create metadata for `filename` with the given size.
    pub fn new(filename: impl Into<String>, size: u64) -> Self {
        Self {
            filename: filename.into(),
            size,
        }
    }
}

/// Full content of a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileContent {
    /// Name the file was looked up by
    pub filename: String,
    /// Raw file bytes
    pub content: Vec<u8>,
}

impl FileContent {
    /// Create a content value for `filename`.
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
        }
    }

    /// Content size in bytes.
    pub fn size(&self) -> u64 {
        self.content.len() as u64
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_metadata_serializes_as_flat_object() {
        let json = serde_json::to_value(FileMetadata::new("a.txt", 42)).unwrap();
        assert_eq!(json, serde_json::json!({"filename": "a.txt", "size": 42}));
    }

    #[test]
    fn test_content_size() {
        let content = FileContent::new("x.txt", b"hello".to_vec());
        assert_eq!(content.size(), 5);
    }
}
