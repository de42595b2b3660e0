use crate::video::VideoStore;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

/// In-process video repository for development without a database and for tests.
#[derive(Default)]
pub struct InMemoryVideoStore {
    videos: RwLock<HashMap<Uuid, Video>>,
}

impl InMemoryVideoStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VideoStore for InMemoryVideoStore {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        Ok(self.videos.read().await.get(&id).cloned())
    }

    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let mut videos = self.videos.write().await;
        match videos.get_mut(&video.id) {
            Some(existing) => {
                *existing = video.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("Video not found".to_string())),
        }
    }

    async fn create_video(
        &self,
        params: CreateVideoParams,
        user_id: Uuid,
    ) -> Result<Video, AppError> {
        let video = Video::new(user_id, params);
        self.videos.write().await.insert(video.id, video.clone());
        tracing::info!(video_id = %video.id, "Video record created");
        Ok(video)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
