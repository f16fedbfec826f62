use async_trait::async_trait;
use aws_sdk_s3 as s3;
use s3::presigning::PresigningConfig;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::models::StoredObject;

/// StorageService
///
/// Abstract contract for the object-storage layer behind the cloud screen and
/// the form-media upload pipeline. The concrete client talks to any
/// S3-compatible endpoint (MinIO locally, managed S3 in production);
/// `MockStorageService` stands in for tests.
#[async_trait]
pub trait StorageService: Send + Sync {
    /// Ensures the configured bucket exists. Used in the `Env::Local` setup to
    /// provision the MinIO bucket; no-op in production.
    async fn ensure_bucket_exists(&self);

    /// Generates a temporary, signed URL allowing a client to upload a file
    /// directly to the bucket, constrained to the given content type.
    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, String>;

    /// Lists stored objects, optionally below a key prefix.
    async fn list_objects(&self, prefix: Option<String>) -> Result<Vec<StoredObject>, String>;

    /// Removes one object. True if the call succeeded (S3 deletion is
    /// idempotent and does not report whether the key existed).
    async fn delete_object(&self, key: &str) -> Result<(), String>;
}

/// StorageState
///
/// The concrete type used to share the storage service across the application
/// state.
pub type StorageState = Arc<dyn StorageService>;

/// S3StorageClient
///
/// Implementation backed by the AWS SDK. `force_path_style(true)` is required
/// for MinIO-style gateways (http://endpoint/bucket/key addressing).
#[derive(Clone)]
pub struct S3StorageClient {
    client: s3::Client,
    bucket_name: String,
}

impl S3StorageClient {
    pub async fn new(
        endpoint: &str,
        region: &str,
        access_key: &str,
        secret_key: &str,
        bucket: &str,
    ) -> Self {
        let credentials =
            s3::config::Credentials::new(access_key, secret_key, None, None, "static");

        let config = s3::Config::builder()
            .credentials_provider(credentials)
            .endpoint_url(endpoint)
            .region(s3::config::Region::new(region.to_string()))
            .behavior_version_latest()
            .force_path_style(true)
            .build();

        let client = s3::Client::from_conf(config);

        Self {
            client,
            bucket_name: bucket.to_string(),
        }
    }
}

#[async_trait]
impl StorageService for S3StorageClient {
    /// CreateBucket is idempotent; safe to call at every startup.
    async fn ensure_bucket_exists(&self) {
        let _ = self
            .client
            .create_bucket()
            .bucket(&self.bucket_name)
            .send()
            .await;
    }

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, String> {
        // Expiration constrained to 10 minutes.
        let expires_in = Duration::from_secs(600);

        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| e.to_string())?;

        let presigned_req = self
            .client
            .put_object()
            .bucket(&self.bucket_name)
            .key(key)
            // The client request must carry this Content-Type header.
            .content_type(content_type)
            .presigned(presigning)
            .await
            .map_err(|e| e.to_string())?;

        Ok(presigned_req.uri().to_string())
    }

    async fn list_objects(&self, prefix: Option<String>) -> Result<Vec<StoredObject>, String> {
        let mut request = self.client.list_objects_v2().bucket(&self.bucket_name);
        if let Some(prefix) = prefix {
            request = request.prefix(prefix);
        }

        let output = request.send().await.map_err(|e| e.to_string())?;

        let objects = output
            .contents()
            .iter()
            .filter_map(|object| {
                let key = object.key()?.to_string();
                let last_modified = object
                    .last_modified()
                    .and_then(|ts| chrono::DateTime::from_timestamp(ts.secs(), ts.subsec_nanos()));
                Some(StoredObject {
                    key,
                    size: object.size().unwrap_or(0),
                    last_modified,
                })
            })
            .collect();

        Ok(objects)
    }

    async fn delete_object(&self, key: &str) -> Result<(), String> {
        self.client
            .delete_object()
            .bucket(&self.bucket_name)
            .key(key)
            .send()
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

/// sanitize_key
///
/// Strips directory-navigation segments (`..`, `.`, empty) from a
/// user-provided key so traversal attempts cannot escape the bucket namespace.
fn sanitize_key(key: &str) -> String {
    key.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".." && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// MockStorageService
///
/// Test double: presigning returns a deterministic local URL, and an
/// in-memory key list backs `list_objects`/`delete_object` so the cloud
/// handlers can be exercised without a bucket.
#[derive(Default)]
pub struct MockStorageService {
    /// When true, all operations return a simulated failure.
    pub should_fail: bool,
    objects: Mutex<Vec<StoredObject>>,
}

impl MockStorageService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_failing() -> Self {
        Self {
            should_fail: true,
            objects: Mutex::new(vec![]),
        }
    }

    pub fn with_object(self, key: &str, size: i64) -> Self {
        self.objects.lock().unwrap().push(StoredObject {
            key: key.to_string(),
            size,
            last_modified: None,
        });
        self
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn ensure_bucket_exists(&self) {
        // No-op in mock environment.
    }

    async fn get_presigned_upload_url(
        &self,
        key: &str,
        _content_type: &str,
    ) -> Result<String, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        let sanitized_key = sanitize_key(key);

        Ok(format!(
            "http://localhost:9000/mock-bucket/{}?signature=fake",
            sanitized_key
        ))
    }

    async fn list_objects(&self, prefix: Option<String>) -> Result<Vec<StoredObject>, String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        let objects = self
            .objects
            .lock()
            .unwrap()
            .iter()
            .filter(|object| match &prefix {
                Some(prefix) => object.key.starts_with(prefix),
                None => true,
            })
            .cloned()
            .collect();
        Ok(objects)
    }

    async fn delete_object(&self, key: &str) -> Result<(), String> {
        if self.should_fail {
            return Err("Mock Storage Error: Simulation requested".to_string());
        }

        self.objects
            .lock()
            .unwrap()
            .retain(|object| object.key != key);
        Ok(())
    }
}
