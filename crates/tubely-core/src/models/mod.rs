//! Domain models
//!
//! Video metadata records and the media vocabulary used by the upload pipeline.

pub mod media;
pub mod video;

pub use media::{MediaKind, Orientation};
pub use video::{CreateVideoParams, CreateVideoRequest, ReferenceKind, Video};
