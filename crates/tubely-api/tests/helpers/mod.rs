//! Shared test fixtures: an in-process app with an in-memory metadata store, an
//! in-memory object store, scratch directories and a canned probe.

#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use object_store::memory::InMemory;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;
use tubely_api::auth::JwtService;
use tubely_api::{setup_routes, AppState, UploadState};
use tubely_core::config::{BaseConfig, UploadConfig};
use tubely_core::models::{CreateVideoParams, Video};
use tubely_core::{Config, PlacementMode, StorageBackend};
use tubely_db::{InMemoryVideoStore, VideoStore};
use tubely_processing::probe::parse_probe_output;
use tubely_processing::{AspectProbe, Placement, ProbeError, ReferencePublisher, StreamInfo};
use tubely_storage::{LocalStorage, S3Storage, Storage, StorageError, StorageResult};
use uuid::Uuid;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-at-least-32-characters-long";
pub const TEST_BUCKET: &str = "tubely-videos";
pub const TEST_REGION: &str = "us-east-2";
pub const ASSETS_BASE_URL: &str = "http://localhost:8091/assets";

pub const LANDSCAPE_JSON: &[u8] =
    br#"{"streams":[{"index":0,"codec_type":"video","width":1920,"height":1080}]}"#;
pub const PORTRAIT_JSON: &[u8] =
    br#"{"streams":[{"index":0,"codec_type":"video","width":1080,"height":1920}]}"#;
pub const EMPTY_STREAMS_JSON: &[u8] = br#"{"streams":[]}"#;

/// Probe that answers with canned ffprobe output and remembers the staged path.
pub struct FakeProbe {
    output: &'static [u8],
    seen: Mutex<Option<(PathBuf, bool)>>,
}

impl FakeProbe {
    pub fn new(output: &'static [u8]) -> Self {
        Self {
            output,
            seen: Mutex::new(None),
        }
    }

    /// Path that was probed and whether it existed at the time.
    pub fn seen(&self) -> Option<(PathBuf, bool)> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl AspectProbe for FakeProbe {
    async fn probe(&self, path: &Path) -> Result<Vec<StreamInfo>, ProbeError> {
        *self.seen.lock().unwrap() = Some((path.to_path_buf(), path.exists()));
        parse_probe_output(self.output)
    }
}

/// Object storage whose every write fails, as an unreachable bucket would.
pub struct FailingStorage;

#[async_trait]
impl Storage for FailingStorage {
    async fn put_bytes(&self, key: &str, _data: Vec<u8>, _: &str) -> StorageResult<String> {
        Err(StorageError::UploadFailed(format!("connection reset writing {}", key)))
    }

    async fn put_file(&self, key: &str, _path: &Path, _: &str) -> StorageResult<String> {
        Err(StorageError::UploadFailed(format!("connection reset writing {}", key)))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// Knobs for `setup_test_app_from`; `Default` matches `setup_test_app`.
pub struct TestAppOptions {
    pub thumbnail_placement: PlacementMode,
    pub probe_output: &'static [u8],
    pub environment: &'static str,
    pub failing_video_storage: bool,
    pub max_thumbnail_size: usize,
    pub max_video_size: usize,
}

impl Default for TestAppOptions {
    fn default() -> Self {
        Self {
            thumbnail_placement: PlacementMode::Inline,
            probe_output: LANDSCAPE_JSON,
            environment: "test",
            failing_video_storage: false,
            max_thumbnail_size: 1024 * 1024,
            max_video_size: 4 * 1024 * 1024,
        }
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    pub videos: Arc<InMemoryVideoStore>,
    pub object_store: Arc<InMemory>,
    pub probe: Arc<FakeProbe>,
    pub staging: TempDir,
    pub assets: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn token_for(&self, user_id: Uuid) -> String {
        self.state
            .jwt
            .issue_token(user_id, chrono::Duration::hours(1))
            .expect("Failed to issue token")
    }

    pub fn bearer(&self, user_id: Uuid) -> String {
        format!("Bearer {}", self.token_for(user_id))
    }

    /// Create a record owned by `owner` directly in the store.
    pub async fn create_video(&self, owner: Uuid) -> Video {
        self.videos
            .create_video(
                CreateVideoParams {
                    title: "Boots demo".to_string(),
                    description: "A short clip".to_string(),
                },
                owner,
            )
            .await
            .expect("Failed to create video")
    }

    pub async fn stored(&self, id: Uuid) -> Video {
        self.videos
            .get_video(id)
            .await
            .expect("store failure")
            .expect("video missing")
    }

    pub fn staging_is_empty(&self) -> bool {
        std::fs::read_dir(self.staging.path())
            .expect("staging dir")
            .next()
            .is_none()
    }
}

fn test_config(assets: &Path, staging: &Path, options: &TestAppOptions) -> Config {
    Config(Box::new(UploadConfig {
        base: BaseConfig {
            server_port: 8091,
            cors_origins: vec!["*".to_string()],
            db_max_connections: 5,
            db_timeout_seconds: 5,
            jwt_secret: TEST_JWT_SECRET.to_string(),
            environment: options.environment.to_string(),
        },
        database_url: None,
        storage_backend: Some(StorageBackend::S3),
        s3_bucket: Some(TEST_BUCKET.to_string()),
        s3_region: Some(TEST_REGION.to_string()),
        s3_endpoint: None,
        aws_region: None,
        local_storage_path: None,
        local_storage_base_url: None,
        thumbnail_placement: options.thumbnail_placement,
        assets_root: assets.to_string_lossy().into_owned(),
        assets_base_url: ASSETS_BASE_URL.to_string(),
        max_thumbnail_size_bytes: options.max_thumbnail_size,
        max_video_size_bytes: options.max_video_size,
        ffprobe_path: "ffprobe".to_string(),
        staging_dir: Some(staging.to_string_lossy().into_owned()),
    }))
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_from(TestAppOptions::default()).await
}

pub async fn setup_test_app_with(
    thumbnail_placement: PlacementMode,
    probe_output: &'static [u8],
) -> TestApp {
    setup_test_app_from(TestAppOptions {
        thumbnail_placement,
        probe_output,
        ..TestAppOptions::default()
    })
    .await
}

pub async fn setup_test_app_from(options: TestAppOptions) -> TestApp {
    let assets = tempfile::tempdir().expect("assets dir");
    let staging = tempfile::tempdir().expect("staging dir");
    let config = test_config(assets.path(), staging.path(), &options);

    let videos = Arc::new(InMemoryVideoStore::new());
    let object_store = Arc::new(InMemory::new());
    let object_storage: Arc<dyn Storage> = Arc::new(S3Storage::from_store(
        object_store.clone(),
        TEST_BUCKET.to_string(),
        TEST_REGION.to_string(),
        None,
    ));

    let thumbnail_placement = match options.thumbnail_placement {
        PlacementMode::Inline => Placement::Inline,
        PlacementMode::Filesystem => Placement::Filesystem(Arc::new(
            LocalStorage::new(assets.path(), ASSETS_BASE_URL.to_string())
                .await
                .expect("local storage"),
        )),
        PlacementMode::ObjectStore => Placement::ObjectStore(object_storage.clone()),
    };

    let video_storage: Arc<dyn Storage> = if options.failing_video_storage {
        Arc::new(FailingStorage)
    } else {
        object_storage
    };

    let probe = Arc::new(FakeProbe::new(options.probe_output));

    let state = Arc::new(AppState {
        jwt: JwtService::new(TEST_JWT_SECRET),
        videos: videos.clone(),
        upload: UploadState {
            probe: probe.clone(),
            thumbnail_placement,
            video_placement: Placement::ObjectStore(video_storage),
            publisher: ReferencePublisher::new(videos.clone()),
            staging_dir: Some(staging.path().to_path_buf()),
            max_thumbnail_size: config.max_thumbnail_size_bytes(),
            max_video_size: config.max_video_size_bytes(),
        },
        config,
    });

    let app = setup_routes(state.clone()).expect("Failed to build routes");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        state,
        videos,
        object_store,
        probe,
        staging,
        assets,
    }
}
