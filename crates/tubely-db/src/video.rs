use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::AppError;
use uuid::Uuid;

/// Metadata store primitives used by the upload pipeline.
///
/// `update_video` replaces the whole record; concurrent writers race and the last
/// one wins.
#[async_trait]
pub trait VideoStore: Send + Sync {
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError>;

    async fn update_video(&self, video: &Video) -> Result<(), AppError>;

    async fn create_video(
        &self,
        params: CreateVideoParams,
        user_id: Uuid,
    ) -> Result<Video, AppError>;

    /// Cheap round trip used by the readiness probe
    async fn ping(&self) -> Result<(), AppError>;
}

/// Apply the embedded migrations in `migrations/`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run database migrations: {}", e)))
}

/// PostgreSQL-backed video repository
#[derive(Clone)]
pub struct PgVideoStore {
    pool: PgPool,
}

impl PgVideoStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoStore for PgVideoStore {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.operation = "select", db.record_id = %id))]
    async fn get_video(&self, id: Uuid) -> Result<Option<Video>, AppError> {
        let video = sqlx::query_as::<Postgres, Video>(
            r#"
            SELECT id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(video)
    }

    #[tracing::instrument(skip(self, video), fields(db.table = "videos", db.operation = "update", db.record_id = %video.id))]
    async fn update_video(&self, video: &Video) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE videos
            SET updated_at = $2, thumbnail_url = $3, video_url = $4, title = $5, description = $6
            WHERE id = $1
            "#,
        )
        .bind(video.id)
        .bind(video.updated_at)
        .bind(&video.thumbnail_url)
        .bind(&video.video_url)
        .bind(&video.params.title)
        .bind(&video.params.description)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Video not found".to_string()));
        }

        Ok(())
    }

    #[tracing::instrument(skip_all, fields(db.table = "videos", db.operation = "insert", user_id = %user_id))]
    async fn create_video(
        &self,
        params: CreateVideoParams,
        user_id: Uuid,
    ) -> Result<Video, AppError> {
        let video = Video::new(user_id, params);

        let created = sqlx::query_as::<Postgres, Video>(
            r#"
            INSERT INTO videos (id, user_id, created_at, updated_at, title, description)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, created_at, updated_at, thumbnail_url, video_url, title, description
            "#,
        )
        .bind(video.id)
        .bind(video.user_id)
        .bind(video.created_at)
        .bind(video.updated_at)
        .bind(&video.params.title)
        .bind(&video.params.description)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(video_id = %created.id, "Video record created");

        Ok(created)
    }

    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query_scalar::<Postgres, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}
