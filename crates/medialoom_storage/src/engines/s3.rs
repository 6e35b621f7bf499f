//! Amazon S3 (and S3-compatible) storage.

use super::FILE_FAMILY;
use super::file::parse_upload;
use crate::{EngineContext, EngineDescriptor, StorageEngine, safe_file_name};
use async_trait::async_trait;
use aws_config::{AppName, Region};
use aws_sdk_s3::config::timeout::TimeoutConfig;
use aws_sdk_s3::config::{Credentials, SharedCredentialsProvider};
use aws_sdk_s3::primitives::ByteStream;
use medialoom_core::{
    EngineInstance, FileMetadata, FileRecord, IngestSource, MediaRecord, StorageUri,
};
use medialoom_error::{
    EngineError, EngineErrorKind, MedialoomResult, StorageError, StorageErrorKind,
    UnsuitableEngineError,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

/// Instance data of an `amazon_s3` engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmazonS3Settings {
    /// Bucket name
    pub bucket: String,
    /// Region, e.g. `us-east-1`
    pub region: String,
    /// Custom endpoint for S3-compatible services
    #[serde(default)]
    pub endpoint: Option<String>,
    /// Access key id
    pub access_key: String,
    /// Secret access key
    pub secret_key: String,
    /// Key prefix inside the bucket
    #[serde(default)]
    pub prefix: Option<String>,
    /// Public base URL objects are served under
    pub public_url: String,
    /// Use path-style addressing
    #[serde(default)]
    pub force_path_style: bool,
}

/// Uploads files to an S3 bucket.
#[derive(Debug)]
pub struct AmazonS3Storage {
    instance: EngineInstance,
    settings: AmazonS3Settings,
    client: aws_sdk_s3::Client,
}

impl AmazonS3Storage {
    /// Build a client from instance data.
    ///
    /// Every S3 operation is bounded by the context's HTTP timeout.
    pub fn new(instance: EngineInstance, ctx: &EngineContext) -> MedialoomResult<Self> {
        let settings: AmazonS3Settings =
            serde_json::from_value(instance.data().clone()).map_err(|e| {
                EngineError::new(EngineErrorKind::InvalidSettings {
                    engine: instance.engine_type().clone(),
                    reason: e.to_string(),
                })
            })?;
        let app_name = AppName::new("medialoom").map_err(|e| {
            EngineError::new(EngineErrorKind::InvalidSettings {
                engine: instance.engine_type().clone(),
                reason: e.to_string(),
            })
        })?;

        let client = aws_sdk_s3::Client::from_conf({
            let mut builder = aws_sdk_s3::Config::builder();
            builder.set_endpoint_url(settings.endpoint.clone());
            builder.set_app_name(Some(app_name));
            builder.set_region(Some(Region::new(settings.region.clone())));
            builder.set_force_path_style(Some(settings.force_path_style));
            builder.set_timeout_config(Some(
                TimeoutConfig::builder()
                    .operation_timeout(*ctx.http_timeout())
                    .build(),
            ));
            builder.set_credentials_provider(Some(SharedCredentialsProvider::new(
                Credentials::new(
                    settings.access_key.clone(),
                    settings.secret_key.clone(),
                    None,
                    None,
                    "MedialoomInstanceCredentials",
                ),
            )));
            builder.build()
        });

        tracing::debug!(bucket = %settings.bucket, "Configured S3 engine");
        Ok(Self {
            instance,
            settings,
            client,
        })
    }

    /// Object key of a stored file.
    pub fn key_for(&self, unique_id: &str) -> String {
        match self.settings.prefix.as_deref().map(|p| p.trim_matches('/')) {
            Some(prefix) if !prefix.is_empty() => format!("{}/{}", prefix, unique_id),
            _ => unique_id.to_string(),
        }
    }
}

#[async_trait]
impl StorageEngine for AmazonS3Storage {
    fn instance(&self) -> &EngineInstance {
        &self.instance
    }

    async fn parse(&self, source: &IngestSource) -> MedialoomResult<FileMetadata> {
        parse_upload(source).await
    }

    #[tracing::instrument(skip_all, fields(engine_type = self.engine_type(), bucket = %self.settings.bucket))]
    async fn store(
        &self,
        _media: &MediaRecord,
        file: &FileRecord,
        source: &IngestSource,
        _meta: &FileMetadata,
    ) -> MedialoomResult<Option<String>> {
        let upload = source
            .as_file()
            .ok_or_else(|| UnsuitableEngineError::new("S3 engine only stores uploads"))?;
        let unique_id = safe_file_name(file, Some(&upload.filename))?;
        let key = self.key_for(&unique_id);

        let body = ByteStream::from_path(&upload.path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                upload.path.display(),
                e
            )))
        })?;
        self.client
            .put_object()
            .bucket(&self.settings.bucket)
            .key(&key)
            .body(body)
            .send()
            .await
            .map_err(|e| StorageError::new(StorageErrorKind::Backend(format!("put {}: {}", key, e))))?;

        tracing::info!(key = %key, "Uploaded file to S3");
        Ok(Some(unique_id))
    }

    #[tracing::instrument(skip_all, fields(engine_type = self.engine_type(), bucket = %self.settings.bucket))]
    async fn delete(&self, file: &FileRecord) -> MedialoomResult<()> {
        let Some(unique_id) = file.unique_id.as_deref() else {
            return Ok(());
        };
        let key = self.key_for(unique_id);
        self.client
            .delete_object()
            .bucket(&self.settings.bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Backend(format!("delete {}: {}", key, e)))
            })?;
        tracing::info!(key = %key, "Deleted S3 object");
        Ok(())
    }

    fn get_uris(&self, file: &Arc<FileRecord>) -> Vec<StorageUri> {
        let Some(unique_id) = file.unique_id.as_deref() else {
            return Vec::new();
        };
        let url = format!(
            "{}/{}",
            self.settings.public_url.trim_end_matches('/'),
            self.key_for(unique_id)
        );
        vec![
            StorageUri::new(file.clone(), "http", url.clone()),
            StorageUri::new(file.clone(), "download", url),
        ]
    }
}

/// Descriptor for `amazon_s3`.
pub fn amazon_s3() -> EngineDescriptor {
    EngineDescriptor::new("amazon_s3", "Amazon S3", |instance, ctx| {
        Ok(Arc::new(AmazonS3Storage::new(instance, ctx)?) as Arc<dyn StorageEngine>)
    })
    .family(FILE_FAMILY)
    .try_before("local_files")
    .default_data(json!({
        "bucket": "",
        "region": "us-east-1",
        "endpoint": null,
        "access_key": "",
        "secret_key": "",
        "prefix": null,
        "public_url": "",
        "force_path_style": false,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use medialoom_core::{IngestSettings, ThumbnailSettings};
    use std::time::Duration;

    fn context(timeout: Duration) -> EngineContext {
        let thumbnails = ThumbnailSettings::builder()
            .image_dir("images")
            .build()
            .expect("thumbnail settings");
        let settings = IngestSettings::builder()
            .http_timeout(timeout)
            .media_dir("media")
            .thumbnails(thumbnails)
            .build()
            .expect("ingest settings");
        EngineContext::new(reqwest::Client::new(), &settings)
    }

    fn bucket(prefix: Option<&str>) -> EngineInstance {
        EngineInstance::new(
            7,
            "amazon_s3",
            "Archive bucket",
            json!({
                "bucket": "archive",
                "region": "eu-west-1",
                "access_key": "AKIDEXAMPLE",
                "secret_key": "secret",
                "prefix": prefix,
                "public_url": "https://archive.example.org/",
            }),
        )
    }

    #[tokio::test]
    async fn operations_use_context_timeout() {
        let engine = AmazonS3Storage::new(bucket(None), &context(Duration::from_secs(7)))
            .expect("engine");
        let timeouts = engine.client.config().timeout_config().expect("timeout config");
        assert_eq!(timeouts.operation_timeout(), Some(Duration::from_secs(7)));
    }

    #[tokio::test]
    async fn keys_and_uris_honour_prefix() {
        let engine = AmazonS3Storage::new(bucket(Some("/talks/")), &context(Duration::from_secs(30)))
            .expect("engine");
        assert_eq!(engine.key_for("12-keynote.mp4"), "talks/12-keynote.mp4");

        let mut file = FileRecord::pending(1, 7, medialoom_core::MediaKind::Video, "keynote.mp4");
        file.unique_id = Some("12-keynote.mp4".to_string());
        let uris = engine.get_uris(&Arc::new(file));
        assert_eq!(uris.len(), 2);
        assert_eq!(uris[0].file_uri, "https://archive.example.org/talks/12-keynote.mp4");
        assert_eq!(uris[1].scheme, "download");
    }

    #[test]
    fn missing_bucket_is_invalid_settings() {
        let instance = EngineInstance::new(7, "amazon_s3", "Broken", json!({"region": "eu-west-1"}));
        let err = AmazonS3Storage::new(instance, &context(Duration::from_secs(30)))
            .expect_err("bucket is required");
        assert!(err.to_string().contains("amazon_s3"));
    }
}
