// Error types module
use lingodb_store::StoreError;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, LingoError>;

/// Main error type for LingoDB core operations.
#[derive(Error, Debug)]
pub enum LingoError {
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Resx error: {0}")]
    Resx(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl LingoError {
    /// Short machine-readable code for the HTTP layer.
    pub fn code(&self) -> &'static str {
        match self {
            LingoError::Store(StoreError::NotFound(_)) | LingoError::NotFound(_) => "NOT_FOUND",
            LingoError::Store(StoreError::AlreadyExists(_)) | LingoError::AlreadyExists(_) => {
                "ALREADY_EXISTS"
            }
            LingoError::Store(StoreError::InvalidInput(_)) | LingoError::InvalidInput(_) => {
                "INVALID_INPUT"
            }
            LingoError::Store(_) => "STORAGE_ERROR",
            LingoError::PermissionDenied(_) => "PERMISSION_DENIED",
            LingoError::Translation(_) => "TRANSLATION_ERROR",
            LingoError::Resx(_) => "RESX_ERROR",
            LingoError::Io(_) => "IO_ERROR",
            LingoError::Other(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_codes_pass_through() {
        let err = LingoError::from(StoreError::NotFound("x".to_string()));
        assert_eq!(err.code(), "NOT_FOUND");

        let err = LingoError::from(StoreError::Io("disk".to_string()));
        assert_eq!(err.code(), "STORAGE_ERROR");

        assert_eq!(LingoError::PermissionDenied("no".into()).code(), "PERMISSION_DENIED");
    }
}
