//! Object store trait for pluggable binary storage backends.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;

use crate::result::AppResult;

/// A byte stream type used for writing object contents.
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, std::io::Error>> + Send>>;

/// Trait for durable binary object storage addressed by opaque keys.
///
/// Implementations exist for the local filesystem and S3-compatible
/// services. The [`ObjectStore`] trait is defined here in `stela-core`
/// and implemented in `stela-storage`.
///
/// Keys are write-once: uploads always generate fresh keys and nothing
/// ever overwrites an existing object in place. `delete` is idempotent —
/// deleting an absent key succeeds as a no-op, which lets partial-failure
/// cleanup be retried safely.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local", "s3").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Write bytes to an object at the given key.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<()>;

    /// Write a byte stream to an object at the given key, returning the
    /// number of bytes written.
    async fn put_stream(&self, key: &str, stream: ByteStream) -> AppResult<u64>;

    /// Delete the object at the given key. Absent keys are a no-op.
    async fn delete(&self, key: &str) -> AppResult<()>;

    /// Check whether an object exists at the given key.
    async fn exists(&self, key: &str) -> AppResult<bool>;

    /// Resolve the publicly retrievable URL for an object key.
    fn public_url(&self, key: &str) -> String;
}
