//! Remote store trait for abstracting object-store operations.
//!
//! This module defines the [`RemoteStore`] trait which abstracts the three
//! object-store operations the index consumes, for testability and
//! flexibility in choosing a store client implementation.

use async_trait::async_trait;
use bytes::Bytes;

use super::error::ManifestResult;

/// Abstraction over the object-store operations the index consumes.
///
/// This trait allows for different store implementations:
/// - Production: aws-sdk-s3, opendal, any S3-compatible HTTP client
/// - Testing: mock store, LocalStack/MinIO client
///
/// Bucket addressing, transport retries and timeouts are the
/// implementation's responsibility; the index only deals in keys.
///
/// # Example Implementation
///
/// ```rust,ignore
/// use aws_sdk_s3::Client;
///
/// struct AwsRemoteStore {
///     client: Client,
///     bucket: String,
/// }
///
/// #[async_trait]
/// impl RemoteStore for AwsRemoteStore {
///     async fn get_object(&self, key: &str) -> ManifestResult<Bytes> {
///         let resp = self.client
///             .get_object()
///             .bucket(&self.bucket)
///             .key(key)
///             .send()
///             .await?;
///         Ok(resp.body.collect().await?.into_bytes())
///     }
///     // ... other methods
/// }
/// ```
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the full content of an object.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::ObjectNotFound`](super::ManifestError::ObjectNotFound)
    /// if the object is absent, or a transport error if the store is
    /// unreachable.
    async fn get_object(&self, key: &str) -> ManifestResult<Bytes>;

    /// Write an object, replacing any existing content at `key`.
    ///
    /// # Arguments
    ///
    /// * `key` - Object key (path within the bucket)
    /// * `data` - Full content to write
    /// * `content_type` - MIME type recorded with the object
    ///
    /// # Errors
    ///
    /// Returns a transport error on permission or network failures.
    async fn put_object(&self, key: &str, data: Bytes, content_type: &str) -> ManifestResult<()>;

    /// List object keys under a prefix, up to `max_keys` entries.
    ///
    /// Pagination beyond `max_keys` is not consumed by the index; callers
    /// that need an exhaustive listing must not rely on this method.
    ///
    /// # Errors
    ///
    /// Returns a transport error on permission or network failures.
    async fn list_objects(&self, prefix: &str, max_keys: usize) -> ManifestResult<Vec<String>>;
}
