//! Upload orchestration
//!
//! Both flows run the same pipeline: authorize against the stored record, pull the
//! named form field, validate its declared media type, place the bytes and publish
//! the resulting reference. Videos are additionally staged to disk and probed for
//! their orientation before placement. Nothing is published unless every earlier
//! step succeeded.

use std::sync::Arc;

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::Multipart;
use bytes::Bytes;
use tubely_core::models::{MediaKind, ReferenceKind, Video};
use tubely_core::AppError;
use tubely_processing::{
    classify, MediaTypeValidator, PlacementPayload, PlacementRequest, StagedUpload,
};
use uuid::Uuid;

use crate::constants::{THUMBNAIL_FIELD, VIDEO_FIELD};
use crate::error::multipart_error;
use crate::state::AppState;

fn form_error(err: MultipartError) -> AppError {
    multipart_error(err.status(), err.body_text())
}

fn rejected_form(rejection: MultipartRejection) -> AppError {
    multipart_error(rejection.status(), rejection.body_text())
}

/// The part's content type header as sent, parameters and casing included.
fn declared_type(header: Option<&str>, kind: MediaKind) -> String {
    header.unwrap_or(kind.content_type()).to_string()
}

fn missing_field() -> AppError {
    AppError::BadRequest("Unable to parse form file".to_string())
}

pub struct UploadService {
    state: Arc<AppState>,
}

impl UploadService {
    pub fn new(state: &Arc<AppState>) -> Self {
        Self {
            state: state.clone(),
        }
    }

    /// Fetch the record and check the caller owns it.
    ///
    /// Runs before the body is read so unauthorized callers never get bytes staged.
    async fn authorize(&self, video_id: Uuid, user_id: Uuid) -> Result<Video, AppError> {
        let video = self
            .state
            .videos
            .get_video(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Couldn't find video".to_string()))?;

        if !video.is_owned_by(user_id) {
            return Err(AppError::Forbidden(
                "Not authorized to update this video".to_string(),
            ));
        }

        Ok(video)
    }

    /// authorize → read `thumbnail` field → validate → place → publish
    pub async fn upload_thumbnail(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Video, AppError> {
        self.authorize(video_id, user_id).await?;
        let multipart = multipart.map_err(rejected_form)?;

        let upload = &self.state.upload;
        let (kind, declared_type, data) =
            read_thumbnail(multipart, upload.max_thumbnail_size).await?;

        tracing::debug!(
            content_type = %declared_type,
            size = data.len(),
            placement = %upload.thumbnail_placement.mode(),
            "Thumbnail received"
        );

        let reference = upload
            .thumbnail_placement
            .place(PlacementRequest {
                video_id,
                kind,
                declared_type: &declared_type,
                orientation: None,
                payload: PlacementPayload::Bytes(data),
            })
            .await?;

        upload
            .publisher
            .publish(video_id, user_id, ReferenceKind::Thumbnail, reference)
            .await
    }

    /// authorize → stage `video` field → validate → probe → place → publish
    ///
    /// The staged file is removed when this returns, on success or failure.
    pub async fn upload_video(
        &self,
        video_id: Uuid,
        user_id: Uuid,
        multipart: Result<Multipart, MultipartRejection>,
    ) -> Result<Video, AppError> {
        self.authorize(video_id, user_id).await?;
        let multipart = multipart.map_err(rejected_form)?;

        let upload = &self.state.upload;
        let (kind, declared_type, staged) = stage_video(
            multipart,
            upload.staging_dir.as_deref(),
            upload.max_video_size,
        )
        .await?;

        let streams = upload.probe.probe(staged.path()).await?;
        let orientation = classify(&streams)?;

        tracing::info!(
            size = staged.size(),
            orientation = %orientation,
            "Video staged and probed"
        );

        let reference = upload
            .video_placement
            .place(PlacementRequest {
                video_id,
                kind,
                declared_type: &declared_type,
                orientation: Some(orientation),
                payload: PlacementPayload::Staged(staged.path()),
            })
            .await?;

        upload
            .publisher
            .publish(video_id, user_id, ReferenceKind::Video, reference)
            .await
    }
}

// The field is consumed inside the loop; `Field` borrows the multipart stream.
async fn read_thumbnail(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<(MediaKind, String, Bytes), AppError> {
    let validator = MediaTypeValidator::thumbnail();

    while let Some(field) = multipart.next_field().await.map_err(form_error)? {
        if field.name() != Some(THUMBNAIL_FIELD) {
            continue;
        }

        let kind = validator.validate(field.content_type())?;
        let declared_type = declared_type(field.content_type(), kind);
        let data = field.bytes().await.map_err(form_error)?;

        if data.len() > max_size {
            return Err(AppError::PayloadTooLarge(format!(
                "Thumbnail exceeds {} bytes",
                max_size
            )));
        }

        return Ok((kind, declared_type, data));
    }

    Err(missing_field())
}

async fn stage_video(
    mut multipart: Multipart,
    staging_dir: Option<&std::path::Path>,
    max_size: usize,
) -> Result<(MediaKind, String, StagedUpload), AppError> {
    let validator = MediaTypeValidator::video();

    while let Some(mut field) = multipart.next_field().await.map_err(form_error)? {
        if field.name() != Some(VIDEO_FIELD) {
            continue;
        }

        let kind = validator.validate(field.content_type())?;
        let declared_type = declared_type(field.content_type(), kind);
        let mut staged = StagedUpload::create(staging_dir)?;

        while let Some(chunk) = field.chunk().await.map_err(form_error)? {
            if staged.size() + chunk.len() as u64 > max_size as u64 {
                return Err(AppError::PayloadTooLarge(format!(
                    "Video exceeds {} bytes",
                    max_size
                )));
            }
            staged.append(&chunk).await?;
        }

        staged.finish().await?;
        return Ok((kind, declared_type, staged));
    }

    Err(missing_field())
}
