//! Shared key generation for storage placements.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use uuid::Uuid;

/// Number of random bytes behind a generated object name.
const GENERATED_NAME_BYTES: usize = 32;

/// Prefix used for object-store keys of media that carries no orientation.
pub const THUMBNAIL_PREFIX: &str = "thumbnails";

/// Random, URL-safe object name (32 bytes, base64 without padding).
pub fn generate_name() -> String {
    let mut buf = [0u8; GENERATED_NAME_BYTES];
    rand::rng().fill_bytes(&mut buf);
    URL_SAFE_NO_PAD.encode(buf)
}

/// Object-store key: `{prefix}/{generated}.{ext}`.
pub fn object_key(prefix: &str, extension: &str) -> String {
    format!("{}/{}.{}", prefix, generate_name(), extension)
}

/// Filesystem key: `{video_id}.{ext}`. Re-uploads for the same video overwrite.
pub fn filesystem_key(video_id: Uuid, extension: &str) -> String {
    format!("{}.{}", video_id, extension)
}

/// Reject keys that could escape a storage root.
pub fn validate_key(key: &str) -> bool {
    !key.is_empty() && !key.contains("..") && !key.starts_with('/')
}
