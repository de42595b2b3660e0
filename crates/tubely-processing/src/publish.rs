use chrono::Utc;
use std::sync::Arc;
use tubely_core::models::{ReferenceKind, Video};
use tubely_core::AppError;
use tubely_db::VideoStore;
use uuid::Uuid;

/// Writes a placed reference onto the owning video record.
#[derive(Clone)]
pub struct ReferencePublisher {
    store: Arc<dyn VideoStore>,
}

impl ReferencePublisher {
    pub fn new(store: Arc<dyn VideoStore>) -> Self {
        Self { store }
    }

    /// Re-read the record, check ownership, replace one reference and write it back.
    ///
    /// There is no locking: two uploads racing on the same record both succeed and
    /// the later write wins.
    #[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user_id, kind = kind.as_str()))]
    pub async fn publish(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        kind: ReferenceKind,
        reference: String,
    ) -> Result<Video, AppError> {
        let video = self
            .store
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::Forbidden("Couldn't update video".to_string()));
        }

        let updated = video.with_reference(kind, reference, Utc::now());
        self.store.update_video(&updated).await?;

        tracing::info!(video_id = %video_id, "Video reference published");

        Ok(updated)
    }
}
