//! Syntactic validation of incoming requests.

use thiserror::Error;

use crate::proto::{FileContentRequest, FileInfoRequest, ListFilesRequest};

/// A request field failed its syntactic constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required string field was empty
    #[error("{field} must not be empty")]
    Empty {
        /// Name of the offending field
        field: &'static str,
    },
}

/// Implemented by every request type the server accepts.
pub trait Validate {
    /// Check the request's field constraints.
    fn validate(&self) -> Result<(), ValidationError>;
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

impl Validate for ListFilesRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

impl Validate for FileInfoRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("filename", &self.filename)
    }
}

impl Validate for FileContentRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        require_non_empty("filename", &self.filename)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_list_request_always_valid() {
        assert_eq!(ListFilesRequest {}.validate(), Ok(()));
    }

    #[test]
    fn test_empty_filename_rejected() {
        let err = FileInfoRequest {
            filename: String::new(),
        }
        .validate()
        .unwrap_err();
        assert_eq!(err, ValidationError::Empty { field: "filename" });
        assert_eq!(err.to_string(), "filename must not be empty");

        assert!(
            FileContentRequest {
                filename: String::new()
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn test_non_empty_filename_accepted() {
        assert!(
            FileContentRequest {
                filename: "a.txt".to_string()
            }
            .validate()
            .is_ok()
        );
    }
}
