//! Application state shared by every handler.
//!
//! Built once in `setup::initialize_app` (or directly by tests) and handed to the
//! router as `Arc<AppState>`.

use crate::auth::JwtService;
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::VideoStore;
use tubely_processing::{AspectProbe, Placement, ReferencePublisher};

/// Everything the two upload flows need besides the metadata store.
#[derive(Clone)]
pub struct UploadState {
    pub probe: Arc<dyn AspectProbe>,
    pub thumbnail_placement: Placement,
    pub video_placement: Placement,
    pub publisher: ReferencePublisher,
    /// Where streamed videos are staged; system temp dir when `None`
    pub staging_dir: Option<PathBuf>,
    pub max_thumbnail_size: usize,
    pub max_video_size: usize,
}

pub struct AppState {
    pub config: Config,
    pub videos: Arc<dyn VideoStore>,
    pub jwt: JwtService,
    pub upload: UploadState,
}
