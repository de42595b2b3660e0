//! Application setup and initialization
//!
//! Builds the metadata store, storage placements and probe from `Config`, wires them
//! into `AppState` and returns the router.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::auth::JwtService;
use crate::state::{AppState, UploadState};
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tubely_core::Config;
use tubely_db::{InMemoryVideoStore, PgVideoStore, VideoStore};
use tubely_processing::{FfprobeProbe, ReferencePublisher};

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry()
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!(
        environment = %config.environment(),
        "Configuration loaded and validated successfully"
    );

    let videos: Arc<dyn VideoStore> = match config.database_url() {
        Some(url) => {
            let pool = database::setup_database(&config, url).await?;
            Arc::new(PgVideoStore::new(pool))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, video records are kept in memory only");
            Arc::new(InMemoryVideoStore::new())
        }
    };

    let (thumbnail_placement, video_placement) = storage::setup_placements(&config).await?;

    let probe = FfprobeProbe::new(config.ffprobe_path())
        .context("FFPROBE_PATH is not a usable executable path")?;

    let upload = UploadState {
        probe: Arc::new(probe),
        thumbnail_placement,
        video_placement,
        publisher: ReferencePublisher::new(videos.clone()),
        staging_dir: config.staging_dir().map(PathBuf::from),
        max_thumbnail_size: config.max_thumbnail_size_bytes(),
        max_video_size: config.max_video_size_bytes(),
    };

    if let Some(dir) = &upload.staging_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create staging dir {}", dir.display()))?;
    }

    let state = Arc::new(AppState {
        jwt: JwtService::new(config.jwt_secret()),
        config,
        videos,
        upload,
    });

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
