//! OpenAPI documentation, served at `/api/openapi.json`.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use tubely_core::models;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tubely API",
        version = "0.1.0",
        description = "Video and thumbnail uploads. Thumbnails are stored inline, on the local filesystem or in object storage; videos are probed for orientation and stored in object storage."
    ),
    paths(
        handlers::videos::create_video,
        handlers::videos::get_video,
        handlers::thumbnail_upload::upload_thumbnail,
        handlers::video_upload::upload_video,
    ),
    components(schemas(
        models::Video,
        models::CreateVideoRequest,
        models::MediaKind,
        models::Orientation,
        error::ErrorResponse,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "videos", description = "Video records"),
        (name = "uploads", description = "Thumbnail and video uploads")
    )
)]
pub struct ApiDoc;
