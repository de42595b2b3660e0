mod helpers;

use helpers::setup_test_app;
use tubely_core::models::Video;
use uuid::Uuid;

#[tokio::test]
async fn test_create_then_get_video() {
    let app = setup_test_app().await;
    let user = Uuid::new_v4();

    let response = app
        .client()
        .post("/api/videos")
        .add_header("Authorization", app.bearer(user))
        .json(&serde_json::json!({
            "title": "Boots in the wild",
            "description": "Field test"
        }))
        .await;

    assert_eq!(response.status_code(), 201);
    let created: Video = response.json();
    assert_eq!(created.user_id, user);
    assert_eq!(created.params.title, "Boots in the wild");
    assert!(created.thumbnail_url.is_none());

    let response = app
        .client()
        .get(&format!("/api/videos/{}", created.id))
        .add_header("Authorization", app.bearer(user))
        .await;

    assert_eq!(response.status_code(), 200);
    let fetched: Video = response.json();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_video_requires_credential() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/videos")
        .json(&serde_json::json!({ "title": "x" }))
        .await;

    assert_eq!(response.status_code(), 401);
}

#[tokio::test]
async fn test_create_video_rejects_empty_title() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/videos")
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .json(&serde_json::json!({ "title": "" }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_get_video_not_found() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get(&format!("/api/videos/{}", Uuid::new_v4()))
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 404);
}

#[tokio::test]
async fn test_get_video_malformed_id() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/api/videos/12345")
        .add_header("Authorization", app.bearer(Uuid::new_v4()))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = setup_test_app().await;

    let live = app.client().get("/health").await;
    assert_eq!(live.status_code(), 200);
    let body: serde_json::Value = live.json();
    assert_eq!(body["status"], "alive");

    let ready = app.client().get("/health/ready").await;
    assert_eq!(ready.status_code(), 200);
    let body: serde_json::Value = ready.json();
    assert_eq!(body["database"], "ready");
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app().await;

    let response = app.client().get("/api/openapi.json").await;
    assert_eq!(response.status_code(), 200);
    let body: serde_json::Value = response.json();
    assert!(body["paths"]["/api/video_upload/{video_id}"].is_object());
}
