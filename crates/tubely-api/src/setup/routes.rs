//! Route configuration and setup

use crate::api_doc::get_openapi_spec;
use crate::constants::{API_PREFIX, ASSETS_ROUTE};
use crate::handlers;
use crate::middleware::error_details_middleware;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tubely_core::Config;

// Multipart framing on top of the file itself.
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<axum::Router, anyhow::Error> {
    let cors = setup_cors(&state.config)?;

    let app = public_routes()
        .merge(protected_routes(&state))
        .nest_service(ASSETS_ROUTE, ServeDir::new(state.config.assets_root()))
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            error_details_middleware,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(handlers::health::liveness_check))
        .route("/health/ready", get(handlers::health::readiness_check))
        .route(
            &format!("{}/openapi.json", API_PREFIX),
            get(|| async { Json(get_openapi_spec()) }),
        )
}

/// Routes whose handlers take an `AuthUser`.
///
/// Each upload route carries its own body ceiling; exceeding it fails the multipart
/// read with 413.
fn protected_routes(state: &AppState) -> Router<Arc<AppState>> {
    let thumbnail_limit = state
        .upload
        .max_thumbnail_size
        .saturating_add(FORM_OVERHEAD_BYTES);
    let video_limit = state.upload.max_video_size.saturating_add(FORM_OVERHEAD_BYTES);

    Router::new()
        .route(
            &format!("{}/videos", API_PREFIX),
            post(handlers::videos::create_video),
        )
        .route(
            &format!("{}/videos/{{video_id}}", API_PREFIX),
            get(handlers::videos::get_video),
        )
        .route(
            &format!("{}/thumbnail_upload/{{video_id}}", API_PREFIX),
            post(handlers::thumbnail_upload::upload_thumbnail)
                .layer(DefaultBodyLimit::max(thumbnail_limit)),
        )
        .route(
            &format!("{}/video_upload/{{video_id}}", API_PREFIX),
            post(handlers::video_upload::upload_video).layer(DefaultBodyLimit::max(video_limit)),
        )
}
