use crate::auth::AuthUser;
use crate::error::{ErrorResponse, HttpAppError};
use crate::extractors::VideoIdPath;
use crate::services::UploadService;
use crate::state::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use std::sync::Arc;
use tubely_core::models::Video;

#[utoipa::path(
    post,
    path = "/api/thumbnail_upload/{video_id}",
    tag = "uploads",
    params(
        ("video_id" = uuid::Uuid, Path, description = "Video ID")
    ),
    request_body(content = inline(Object), content_type = "multipart/form-data",
        description = "Form with a `thumbnail` part of type image/jpeg or image/png"),
    responses(
        (status = 200, description = "Thumbnail stored and published", body = Video),
        (status = 400, description = "Invalid ID, form or media type", body = ErrorResponse),
        (status = 401, description = "Missing credential or not the owner", body = ErrorResponse),
        (status = 404, description = "Video not found", body = ErrorResponse),
        (status = 413, description = "Thumbnail too large", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip_all, fields(video_id = %video_id, user_id = %user.user_id))]
pub async fn upload_thumbnail(
    State(state): State<Arc<AppState>>,
    VideoIdPath(video_id): VideoIdPath,
    user: AuthUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Video>, HttpAppError> {
    let video = UploadService::new(&state)
        .upload_thumbnail(video_id, user.user_id, multipart)
        .await?;

    Ok(Json(video))
}
