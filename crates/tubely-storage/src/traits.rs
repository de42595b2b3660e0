//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use crate::StorageBackend;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;
use tubely_core::AppError;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// The backend rejected our credentials.
    #[error("Storage credentials rejected: {0}")]
    Unauthenticated(String),

    /// Credentials were accepted but the operation is not allowed.
    #[error("Storage permission denied: {0}")]
    PermissionDenied(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        // Backend text names buckets and keys; it goes to the log, not the client.
        match err {
            StorageError::Unauthenticated(detail) => {
                tracing::warn!(error = %detail, "Storage backend rejected credentials");
                AppError::Unauthorized("Storage credentials rejected".to_string())
            }
            StorageError::PermissionDenied(detail) => {
                tracing::warn!(error = %detail, "Storage backend denied the operation");
                AppError::Forbidden("Storage permission denied".to_string())
            }
            other => AppError::Storage(other.to_string()),
        }
    }
}

/// Storage abstraction trait
///
/// Placements write through this trait without knowing which backend sits behind it.
/// Every write returns the public URL of the stored object. Writing to an existing
/// key overwrites it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Store an in-memory buffer under `key` and return its public URL.
    async fn put_bytes(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String>;

    /// Store the full contents of a local file under `key` and return its public URL.
    ///
    /// The file is streamed rather than loaded into memory, so this is the path used
    /// for staged video uploads.
    async fn put_file(&self, key: &str, path: &Path, content_type: &str)
        -> StorageResult<String>;

    /// Get the storage backend type
    fn backend_type(&self) -> StorageBackend;
}
