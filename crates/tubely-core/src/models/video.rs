use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Parameters fixed at creation time and carried unchanged through every update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct CreateVideoParams {
    pub title: String,
    pub description: String,
}

/// Video metadata record.
///
/// `id`, `user_id`, `created_at` and `params` never change once the record exists;
/// uploads only touch the two reference fields and `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Video {
    pub id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Public URL or inline `data:` URI of the thumbnail
    pub thumbnail_url: Option<String>,
    pub video_url: Option<String>,
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub params: CreateVideoParams,
}

/// Which reference an upload publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    Thumbnail,
    Video,
}

impl ReferenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceKind::Thumbnail => "thumbnail",
            ReferenceKind::Video => "video",
        }
    }
}

impl Video {
    pub fn new(user_id: Uuid, params: CreateVideoParams) -> Self {
        let now = Utc::now();
        Video {
            id: Uuid::new_v4(),
            user_id,
            created_at: now,
            updated_at: now,
            thumbnail_url: None,
            video_url: None,
            params,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Build the next revision of this record with one reference replaced.
    ///
    /// Identity and creation parameters are copied verbatim; the other reference is
    /// left as it was.
    pub fn with_reference(
        &self,
        kind: ReferenceKind,
        reference: String,
        updated_at: DateTime<Utc>,
    ) -> Video {
        let (thumbnail_url, video_url) = match kind {
            ReferenceKind::Thumbnail => (Some(reference), self.video_url.clone()),
            ReferenceKind::Video => (self.thumbnail_url.clone(), Some(reference)),
        };

        Video {
            id: self.id,
            user_id: self.user_id,
            created_at: self.created_at,
            updated_at,
            thumbnail_url,
            video_url,
            params: self.params.clone(),
        }
    }
}

/// Request DTO for creating a new video record
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateVideoRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Title must be between 1 and 255 characters"
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
}

impl From<CreateVideoRequest> for CreateVideoParams {
    fn from(request: CreateVideoRequest) -> Self {
        CreateVideoParams {
            title: request.title,
            description: request.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> Video {
        let mut video = Video::new(
            Uuid::new_v4(),
            CreateVideoParams {
                title: "Boot.dev beach trip".to_string(),
                description: "Waves".to_string(),
            },
        );
        video.video_url = Some("https://example.com/landscape/a.mp4".to_string());
        video
    }

    #[test]
    fn test_with_reference_replaces_only_thumbnail() {
        let video = sample();
        let later = video.updated_at + Duration::seconds(5);

        let updated = video.with_reference(
            ReferenceKind::Thumbnail,
            "data:image/png;base64,AAAA".to_string(),
            later,
        );

        assert_eq!(updated.id, video.id);
        assert_eq!(updated.user_id, video.user_id);
        assert_eq!(updated.created_at, video.created_at);
        assert_eq!(updated.params, video.params);
        assert_eq!(updated.updated_at, later);
        assert_eq!(
            updated.thumbnail_url.as_deref(),
            Some("data:image/png;base64,AAAA")
        );
        assert_eq!(updated.video_url, video.video_url);
    }

    #[test]
    fn test_with_reference_replaces_only_video() {
        let mut video = sample();
        video.thumbnail_url = Some("http://localhost:8091/assets/x.png".to_string());

        let updated = video.with_reference(
            ReferenceKind::Video,
            "https://bucket.s3.us-east-1.amazonaws.com/portrait/b.mp4".to_string(),
            Utc::now(),
        );

        assert_eq!(updated.thumbnail_url, video.thumbnail_url);
        assert!(updated.video_url.unwrap().contains("/portrait/"));
    }

    #[test]
    fn test_params_are_flattened_in_json() {
        let video = sample();
        let json = serde_json::to_value(&video).unwrap();
        assert_eq!(json["title"], "Boot.dev beach trip");
        assert!(json.get("params").is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let empty = CreateVideoRequest {
            title: String::new(),
            description: String::new(),
        };
        assert!(empty.validate().is_err());

        let ok = CreateVideoRequest {
            title: "A title".to_string(),
            description: String::new(),
        };
        assert!(ok.validate().is_ok());
    }
}
