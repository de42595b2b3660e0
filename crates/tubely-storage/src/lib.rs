//! Tubely Storage Library
//!
//! This crate provides the storage abstraction used when placing uploaded media,
//! with implementations for S3-compatible object stores and the local filesystem.
//!
//! # Storage key format
//!
//! - **Object store**: `{prefix}/{generated}.{ext}`, where the prefix is the video's
//!   orientation (`landscape`, `portrait`, `other`) or `thumbnails`
//! - **Filesystem**: `{video_id}.{ext}`
//!
//! Keys must not contain `..` or a leading `/`. Key generation lives in the `keys`
//! module so every placement builds keys the same way.

pub mod factory;
pub mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-local")]
pub use factory::create_asset_storage;
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
pub use tubely_core::StorageBackend;
