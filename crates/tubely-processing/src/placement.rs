//! Storage placement
//!
//! A [`Placement`] turns uploaded bytes into the reference that gets published on the
//! video record. The variant is picked from configuration at startup.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;
use std::path::Path;
use std::sync::Arc;
use tubely_core::models::{MediaKind, Orientation};
use tubely_core::PlacementMode;
use tubely_storage::keys::{filesystem_key, object_key, THUMBNAIL_PREFIX};
use tubely_storage::{Storage, StorageResult};
use uuid::Uuid;

/// Where the uploaded bytes currently live.
pub enum PlacementPayload<'a> {
    Bytes(Bytes),
    Staged(&'a Path),
}

pub struct PlacementRequest<'a> {
    pub video_id: Uuid,
    pub kind: MediaKind,
    /// Content type exactly as the client declared it. Inline references embed this
    /// value; stored objects carry the canonical type of `kind`.
    pub declared_type: &'a str,
    /// Only videos are probed; thumbnails carry `None`.
    pub orientation: Option<Orientation>,
    pub payload: PlacementPayload<'a>,
}

#[derive(Clone)]
pub enum Placement {
    /// `data:` URI, nothing is written anywhere
    Inline,
    /// `{video_id}.{ext}` under the public asset root
    Filesystem(Arc<dyn Storage>),
    /// `{orientation}/{random}.{ext}` in the object store
    ObjectStore(Arc<dyn Storage>),
}

impl Placement {
    pub fn mode(&self) -> PlacementMode {
        match self {
            Placement::Inline => PlacementMode::Inline,
            Placement::Filesystem(_) => PlacementMode::Filesystem,
            Placement::ObjectStore(_) => PlacementMode::ObjectStore,
        }
    }

    /// Write the payload and return its public reference. Existing keys are overwritten.
    #[tracing::instrument(skip(self, request), fields(
        placement = %self.mode(),
        video_id = %request.video_id,
        content_type = %request.kind
    ))]
    pub async fn place(&self, request: PlacementRequest<'_>) -> StorageResult<String> {
        let content_type = request.kind.content_type();
        let extension = request.kind.extension();

        match self {
            Placement::Inline => {
                let data = match request.payload {
                    PlacementPayload::Bytes(bytes) => bytes,
                    PlacementPayload::Staged(path) => Bytes::from(tokio::fs::read(path).await?),
                };
                Ok(data_uri(request.declared_type, &data))
            }
            Placement::Filesystem(storage) => {
                let key = filesystem_key(request.video_id, extension);
                write(storage.as_ref(), &key, request.payload, content_type).await
            }
            Placement::ObjectStore(storage) => {
                let prefix = request
                    .orientation
                    .map(|o| o.as_str())
                    .unwrap_or(THUMBNAIL_PREFIX);
                let key = object_key(prefix, extension);
                write(storage.as_ref(), &key, request.payload, content_type).await
            }
        }
    }
}

async fn write(
    storage: &dyn Storage,
    key: &str,
    payload: PlacementPayload<'_>,
    content_type: &str,
) -> StorageResult<String> {
    match payload {
        PlacementPayload::Bytes(bytes) => storage.put_bytes(key, bytes.to_vec(), content_type).await,
        PlacementPayload::Staged(path) => storage.put_file(key, path, content_type).await,
    }
}

/// `data:<content-type>;base64,<payload>`
pub fn data_uri(content_type: &str, data: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(data))
}
