//! Configuration module
//!
//! This module provides the configuration structures for the upload service:
//! server, authentication, metadata store, storage placement and probing settings.
//! Configuration is loaded once at startup and handed to each component; nothing
//! reads the environment after that.

use std::env;

use crate::storage_types::{PlacementMode, StorageBackend};

// Common constants
const SERVER_PORT: u16 = 8091;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const MIN_JWT_SECRET_LEN: usize = 32;
const BYTES_PER_MB: usize = 1024 * 1024;
// 1 TiB; keeps the limits and the multipart overhead added to them far from overflow.
const MAX_SIZE_LIMIT_BYTES: u64 = 1 << 40;

/// Read a megabyte limit from `var` and convert it to bytes.
fn size_limit_bytes(var: &str, default_mb: usize) -> Result<usize, anyhow::Error> {
    let mb = match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map_err(|_| anyhow::anyhow!("{} must be a whole number of megabytes", var))?,
        Err(_) => default_mb,
    };

    mb.checked_mul(BYTES_PER_MB)
        .ok_or_else(|| anyhow::anyhow!("{} is too large", var))
}

/// Base configuration shared by every service
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
}

/// Upload service configuration
#[derive(Clone, Debug)]
pub struct UploadConfig {
    pub base: BaseConfig,
    /// PostgreSQL connection string; when absent an in-memory store is used
    pub database_url: Option<String>,
    // Video storage configuration
    pub storage_backend: Option<StorageBackend>,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Custom endpoint for S3-compatible providers (MinIO, etc.)
    pub aws_region: Option<String>,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Thumbnail placement
    pub thumbnail_placement: PlacementMode,
    pub assets_root: String,
    pub assets_base_url: String,
    // Upload limits
    pub max_thumbnail_size_bytes: usize,
    pub max_video_size_bytes: usize,
    // Probing
    pub ffprobe_path: String,
    pub staging_dir: Option<String>,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<UploadConfig>);

impl Config {
    fn as_upload(&self) -> &UploadConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let environment = self.as_upload().base.environment.to_lowercase();
        environment == "production" || environment == "prod"
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = UploadConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_upload().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_upload().base.server_port
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_upload().base.jwt_secret
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_upload().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_upload().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_upload().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_upload().base.db_timeout_seconds
    }

    pub fn database_url(&self) -> Option<&str> {
        self.as_upload().database_url.as_deref()
    }

    pub fn storage_backend(&self) -> Option<StorageBackend> {
        self.as_upload().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_upload().s3_bucket.as_deref()
    }

    pub fn s3_region(&self) -> Option<&str> {
        self.as_upload().s3_region.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_upload().s3_endpoint.as_deref()
    }

    pub fn aws_region(&self) -> Option<&str> {
        self.as_upload().aws_region.as_deref()
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_upload().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_upload().local_storage_base_url.as_deref()
    }

    pub fn thumbnail_placement(&self) -> PlacementMode {
        self.as_upload().thumbnail_placement
    }

    pub fn assets_root(&self) -> &str {
        &self.as_upload().assets_root
    }

    pub fn assets_base_url(&self) -> &str {
        &self.as_upload().assets_base_url
    }

    pub fn max_thumbnail_size_bytes(&self) -> usize {
        self.as_upload().max_thumbnail_size_bytes
    }

    pub fn max_video_size_bytes(&self) -> usize {
        self.as_upload().max_video_size_bytes
    }

    pub fn ffprobe_path(&self) -> &str {
        &self.as_upload().ffprobe_path
    }

    pub fn staging_dir(&self) -> Option<&str> {
        self.as_upload().staging_dir.as_deref()
    }
}

impl UploadConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        const MAX_THUMBNAIL_SIZE_MB: usize = 10;
        const MAX_VIDEO_SIZE_MB: usize = 1024;

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let is_production =
            environment.to_lowercase() == "production" || environment.to_lowercase() == "prod";
        if is_production && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .collect();

        let server_port: u16 = env::var("PORT")
            .unwrap_or_else(|_| SERVER_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let base = BaseConfig {
            server_port,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env::var("DB_TIMEOUT_SECONDS")
                .unwrap_or_else(|_| CONNECTION_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for authentication"))?,
            environment,
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(s) => Some(s.parse::<StorageBackend>()?),
            Err(_) => None,
        };

        let thumbnail_placement = match env::var("THUMBNAIL_PLACEMENT") {
            Ok(s) => s.parse::<PlacementMode>()?,
            Err(_) => PlacementMode::Inline,
        };

        let config = UploadConfig {
            base,
            database_url: env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            local_storage_path: env::var("LOCAL_STORAGE_PATH").ok(),
            local_storage_base_url: env::var("LOCAL_STORAGE_BASE_URL").ok(),
            thumbnail_placement,
            assets_root: env::var("ASSETS_ROOT").unwrap_or_else(|_| "./assets".to_string()),
            assets_base_url: env::var("ASSETS_BASE_URL")
                .unwrap_or_else(|_| format!("http://localhost:{}/assets", server_port)),
            max_thumbnail_size_bytes: size_limit_bytes(
                "MAX_THUMBNAIL_SIZE_MB",
                MAX_THUMBNAIL_SIZE_MB,
            )?,
            max_video_size_bytes: size_limit_bytes("MAX_VIDEO_SIZE_MB", MAX_VIDEO_SIZE_MB)?,
            ffprobe_path: env::var("FFPROBE_PATH").unwrap_or_else(|_| "ffprobe".to_string()),
            staging_dir: env::var("STAGING_DIR").ok().filter(|s| !s.is_empty()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LEN
            ));
        }

        if let Some(ref url) = self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(anyhow::anyhow!(
                    "DATABASE_URL must be a valid PostgreSQL connection string"
                ));
            }
        }

        if self.max_thumbnail_size_bytes == 0 || self.max_video_size_bytes == 0 {
            return Err(anyhow::anyhow!("Upload size limits must be greater than zero"));
        }

        for (name, limit) in [
            ("MAX_THUMBNAIL_SIZE_MB", self.max_thumbnail_size_bytes),
            ("MAX_VIDEO_SIZE_MB", self.max_video_size_bytes),
        ] {
            if limit as u64 > MAX_SIZE_LIMIT_BYTES {
                return Err(anyhow::anyhow!(
                    "{} must not exceed {} MB",
                    name,
                    MAX_SIZE_LIMIT_BYTES / BYTES_PER_MB as u64
                ));
            }
        }

        // Validate storage backend configuration
        let backend = self.storage_backend.unwrap_or(StorageBackend::S3);
        match backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if self.local_storage_base_url.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_BASE_URL must be set when using local storage backend"
                    ));
                }
            }
        }

        if self.thumbnail_placement == PlacementMode::Filesystem && self.assets_root.is_empty()
        {
            return Err(anyhow::anyhow!(
                "ASSETS_ROOT must be set when THUMBNAIL_PLACEMENT=filesystem"
            ));
        }

        Ok(())
    }
}
