//! Route paths and multipart field names.

/// Prefix for all JSON API routes
pub const API_PREFIX: &str = "/api";

/// Mount point of the filesystem placement root
pub const ASSETS_ROUTE: &str = "/assets";

/// Multipart field carrying a thumbnail image
pub const THUMBNAIL_FIELD: &str = "thumbnail";

/// Multipart field carrying a video file
pub const VIDEO_FIELD: &str = "video";

/// Issuer written into and required on access tokens
pub const TOKEN_ISSUER: &str = "tubely-access";
