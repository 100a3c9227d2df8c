//! S3-compatible object store provider (requires the `s3` feature).
//!
//! Credentials come from the standard AWS credential chain (environment,
//! profile, instance metadata); only endpoint/region/bucket are configured
//! in the application config.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use bytes::{Bytes, BytesMut};
use futures::stream::StreamExt;
use tracing::debug;

use stela_core::config::storage::S3StorageConfig;
use stela_core::error::{AppError, ErrorKind};
use stela_core::result::AppResult;
use stela_core::traits::storage::{ByteStream, ObjectStore};

/// S3-compatible object store.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    public_url_base: String,
}

impl S3ObjectStore {
    /// Create a new S3 object store from configuration.
    pub async fn new(config: &S3StorageConfig, public_url_base: &str) -> AppResult<Self> {
        if config.bucket.is_empty() {
            return Err(AppError::configuration("S3 bucket name is not configured"));
        }

        tracing::info!(
            endpoint = %config.endpoint,
            region = %config.region,
            bucket = %config.bucket,
            "Initializing S3 object store"
        );

        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if !config.endpoint.is_empty() {
            // MinIO and friends need path-style addressing.
            builder = builder.endpoint_url(&config.endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            public_url_base: public_url_base.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    fn provider_type(&self) -> &str {
        "s3"
    }

    async fn health_check(&self) -> AppResult<bool> {
        let reachable = self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .is_ok();
        Ok(reachable)
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<()> {
        let len = data.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(aws_sdk_s3::primitives::ByteStream::from(data))
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to write object: {key}"),
                    e,
                )
            })?;

        debug!(key, bytes = len, "Wrote object");
        Ok(())
    }

    async fn put_stream(&self, key: &str, mut stream: ByteStream) -> AppResult<u64> {
        // Model assets are bounded by the upload size policy, so buffering
        // before a single put is acceptable; multipart upload is not needed.
        let mut buf = BytesMut::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk
                .map_err(|e| AppError::with_source(ErrorKind::Storage, "Stream read error", e))?;
            buf.extend_from_slice(&chunk);
        }

        let total_bytes = buf.len() as u64;
        self.put(key, buf.freeze()).await?;
        Ok(total_bytes)
    }

    async fn delete(&self, key: &str) -> AppResult<()> {
        // S3 DeleteObject on an absent key already succeeds, which matches
        // the idempotency contract.
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object: {key}"),
                    e,
                )
            })?;

        debug!(key, "Deleted object");
        Ok(())
    }

    async fn exists(&self, key: &str) -> AppResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                let service_err = err.into_service_error();
                if service_err.is_not_found() {
                    Ok(false)
                } else {
                    Err(AppError::with_source(
                        ErrorKind::Storage,
                        format!("Failed to check object: {key}"),
                        service_err,
                    ))
                }
            }
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_url_base, key.trim_start_matches('/'))
    }
}
