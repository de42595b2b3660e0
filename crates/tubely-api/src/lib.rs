//! Tubely HTTP API
//!
//! Authenticated thumbnail and video uploads on top of the processing pipeline in
//! `tubely-processing`, plus a small video-record surface.

pub mod api_doc;
pub mod auth;
pub mod constants;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use setup::routes::setup_routes;
pub use state::{AppState, UploadState};
