use crate::keys::validate_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::AmazonS3Builder;
use object_store::buffered::BufWriter;
use object_store::path::Path as ObjectPath;
use object_store::Error as ObjectStoreError;
use object_store::{
    Attribute, Attributes, ObjectStore, PutOptions, PutPayload, Result as ObjectResult,
};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: Arc<dyn ObjectStore>,
    bucket: String,
    region: String,
    endpoint_url: Option<String>, // Custom endpoint for S3-compatible providers
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    pub async fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> StorageResult<Self> {
        // Credentials come from the standard AWS environment variables.
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region.clone())
            .with_bucket_name(bucket.clone());

        if let Some(ref endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder
                .with_endpoint(endpoint.clone())
                .with_allow_http(allow_http);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(Self::from_store(Arc::new(store), bucket, region, endpoint_url))
    }

    /// Wrap an already-built object store, e.g. `object_store::memory::InMemory` in tests.
    pub fn from_store(
        store: Arc<dyn ObjectStore>,
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
    ) -> Self {
        S3Storage {
            store,
            bucket,
            region,
            endpoint_url,
        }
    }

    /// Generate public URL for S3 object
    ///
    /// For AWS S3, uses the standard format: https://{bucket}.s3.{region}.amazonaws.com/{key}
    /// For S3-compatible providers, uses path-style: {endpoint}/{bucket}/{key}
    fn generate_url(&self, key: &str) -> String {
        if let Some(ref endpoint) = self.endpoint_url {
            let base_url = endpoint.trim_end_matches('/');
            format!("{}/{}/{}", base_url, self.bucket, key)
        } else {
            format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            )
        }
    }

    fn location(key: &str) -> StorageResult<ObjectPath> {
        if !validate_key(key) {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        ObjectPath::parse(key).map_err(|e| StorageError::InvalidKey(e.to_string()))
    }

    fn content_type_attributes(content_type: &str) -> Attributes {
        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        attributes
    }
}

/// Keep credential failures distinguishable from ordinary backend failures.
fn map_put_error(err: ObjectStoreError) -> StorageError {
    match err {
        ObjectStoreError::Unauthenticated { .. } => StorageError::Unauthenticated(err.to_string()),
        ObjectStoreError::PermissionDenied { .. } => {
            StorageError::PermissionDenied(err.to_string())
        }
        other => StorageError::UploadFailed(other.to_string()),
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn put_bytes(
        &self,
        key: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> StorageResult<String> {
        let location = Self::location(key)?;
        let size = data.len() as u64;
        let payload = PutPayload::from(Bytes::from(data));
        let opts = PutOptions {
            attributes: Self::content_type_attributes(content_type),
            ..Default::default()
        };

        let start = std::time::Instant::now();

        let result: ObjectResult<_> = self.store.put_opts(&location, payload, opts).await;

        result.map_err(|e| {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            map_put_error(e)
        })?;

        let url = self.generate_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(url)
    }

    async fn put_file(
        &self,
        key: &str,
        path: &Path,
        content_type: &str,
    ) -> StorageResult<String> {
        let location = Self::location(key)?;
        let start = std::time::Instant::now();

        let mut source = tokio::fs::File::open(path).await.map_err(|e| {
            StorageError::UploadFailed(format!("Failed to open {}: {}", path.display(), e))
        })?;

        // Small files go out as a single PUT, larger ones as a multipart upload.
        let mut writer = BufWriter::new(Arc::clone(&self.store), location)
            .with_attributes(Self::content_type_attributes(content_type));

        let copied = match tokio::io::copy(&mut source, &mut writer).await {
            Ok(n) => n,
            Err(e) => {
                if let Err(abort_err) = writer.abort().await {
                    tracing::warn!(error = %abort_err, key = %key, "Failed to abort S3 upload");
                }
                return Err(StorageError::UploadFailed(format!(
                    "Failed to stream {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        if let Err(e) = writer.shutdown().await {
            tracing::error!(
                error = %e,
                bucket = %self.bucket,
                key = %key,
                size_bytes = copied,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 stream upload failed"
            );
            return Err(unwrap_object_store_io(e));
        }

        let url = self.generate_url(key);

        tracing::info!(
            bucket = %self.bucket,
            key = %key,
            size_bytes = copied,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 stream upload successful"
        );

        Ok(url)
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::S3
    }
}

/// `BufWriter` reports object store failures wrapped in `std::io::Error`.
fn unwrap_object_store_io(err: std::io::Error) -> StorageError {
    match err.into_inner() {
        Some(inner) => match inner.downcast::<ObjectStoreError>() {
            Ok(store_err) => map_put_error(*store_err),
            Err(other) => StorageError::UploadFailed(other.to_string()),
        },
        None => StorageError::UploadFailed("stream upload failed".to_string()),
    }
}

#[cfg(all(test, feature = "storage-s3"))]
mod tests {
    use super::*;
    use object_store::memory::InMemory;
    use object_store::ObjectStoreExt;
    use tempfile::tempdir;

    fn storage(endpoint: Option<&str>) -> (S3Storage, Arc<InMemory>) {
        let memory = Arc::new(InMemory::new());
        let storage = S3Storage::from_store(
            memory.clone(),
            "tubely-videos".to_string(),
            "us-east-2".to_string(),
            endpoint.map(String::from),
        );
        (storage, memory)
    }

    #[test]
    fn test_generate_url_aws_and_custom_endpoint() {
        let (aws, _) = storage(None);
        assert_eq!(
            aws.generate_url("landscape/abc.mp4"),
            "https://tubely-videos.s3.us-east-2.amazonaws.com/landscape/abc.mp4"
        );

        let (minio, _) = storage(Some("http://localhost:9000/"));
        assert_eq!(
            minio.generate_url("portrait/abc.mp4"),
            "http://localhost:9000/tubely-videos/portrait/abc.mp4"
        );
    }

    #[tokio::test]
    async fn test_put_file_streams_contents_with_content_type() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("staged.mp4");
        std::fs::write(&source, b"fake mp4 payload").unwrap();

        let (storage, memory) = storage(None);
        let url = storage
            .put_file("landscape/abc.mp4", &source, "video/mp4")
            .await
            .unwrap();

        assert!(url.ends_with("/landscape/abc.mp4"));

        let result = memory
            .get(&ObjectPath::from("landscape/abc.mp4"))
            .await
            .unwrap();
        assert_eq!(
            result.attributes.get(&Attribute::ContentType).map(|v| &**v),
            Some("video/mp4")
        );
        let body = result.bytes().await.unwrap();
        assert_eq!(body.as_ref(), b"fake mp4 payload");
    }

    #[tokio::test]
    async fn test_put_bytes_overwrites_existing_key() {
        let (storage, memory) = storage(None);
        let location = ObjectPath::from("thumbnails/x.png");
        assert!(memory.head(&location).await.is_err());

        for body in [&b"first"[..], &b"second"[..]] {
            storage
                .put_bytes("thumbnails/x.png", body.to_vec(), "image/png")
                .await
                .unwrap();
        }

        let body = memory.get(&location).await.unwrap().bytes().await.unwrap();
        assert_eq!(body.as_ref(), b"second");
    }

    #[tokio::test]
    async fn test_put_file_missing_source_fails() {
        let (storage, _) = storage(None);
        let result = storage
            .put_file("other/x.mp4", Path::new("/nonexistent/staged.mp4"), "video/mp4")
            .await;
        assert!(matches!(result, Err(StorageError::UploadFailed(_))));
    }

    #[test]
    fn test_credential_errors_are_mapped() {
        let err = map_put_error(ObjectStoreError::PermissionDenied {
            path: "landscape/a.mp4".to_string(),
            source: "AccessDenied".into(),
        });
        assert!(matches!(err, StorageError::PermissionDenied(_)));

        let err = map_put_error(ObjectStoreError::Unauthenticated {
            path: "landscape/a.mp4".to_string(),
            source: "InvalidAccessKeyId".into(),
        });
        assert!(matches!(err, StorageError::Unauthenticated(_)));
    }
}
