//! Storage setup and initialization

use anyhow::Result;
use tubely_core::{Config, PlacementMode};
use tubely_processing::Placement;
use tubely_storage::{create_asset_storage, create_storage};

/// Build the thumbnail and video placements.
///
/// Videos always go to the configured storage backend. Thumbnails follow
/// `THUMBNAIL_PLACEMENT`.
pub async fn setup_placements(config: &Config) -> Result<(Placement, Placement)> {
    tracing::info!("Initializing storage abstraction...");
    let storage = create_storage(config).await?;
    tracing::info!(
        backend = %storage.backend_type(),
        "Storage abstraction initialized successfully"
    );

    let thumbnail_placement = match config.thumbnail_placement() {
        PlacementMode::Inline => Placement::Inline,
        PlacementMode::Filesystem => Placement::Filesystem(create_asset_storage(config).await?),
        PlacementMode::ObjectStore => Placement::ObjectStore(storage.clone()),
    };

    tracing::info!(
        thumbnail_placement = %thumbnail_placement.mode(),
        "Thumbnail placement selected"
    );

    Ok((thumbnail_placement, Placement::ObjectStore(storage)))
}
