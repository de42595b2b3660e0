//! Tubely upload processing
//!
//! The building blocks of the upload pipeline, leaves first:
//!
//! - [`validator`]: declared content type against an allow-list
//! - [`probe`]: `ffprobe` invocation and orientation classification
//! - [`staging`]: temporary files for streamed uploads, removed on drop
//! - [`placement`]: turning bytes into a public reference
//! - [`publish`]: writing that reference onto the owning video record
//!
//! Sequencing lives in the API crate; nothing here holds state across requests.

pub mod placement;
pub mod probe;
pub mod publish;
pub mod staging;
pub mod validator;

pub use placement::{Placement, PlacementPayload, PlacementRequest};
pub use probe::{classify, AspectProbe, FfprobeProbe, ProbeError, StreamInfo};
pub use publish::ReferencePublisher;
pub use staging::StagedUpload;
pub use validator::{MediaTypeValidator, ValidationError};
