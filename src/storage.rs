//! # Object Store Access
//!
//! The gateway only reads from its backing store. [`ObjectStore`] is the seam
//! between the response assembler and the store; [`R2Store`] implements it on
//! top of a Cloudflare R2 bucket binding.
//!
//! ## Contract
//!
//! - `Ok(None)` means the object (or the requested slice of it) does not exist
//! - `Err(AppError::StoreUnavailable)` means the store could not answer
//! - Bodies are streamed, never buffered; dropping a body cancels the read
//!
//! Implementations hold no per-request state, so one instance may serve any
//! number of concurrent requests.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use worker::{Bucket, Object, Range, ResponseBody};

use crate::errors::AppResult;
use crate::models::{ObjectKey, ObjectMetadata};

/// Read-only access to immutable audio objects.
#[async_trait(?Send)]
pub trait ObjectStore {
    /// Streamed object content.
    type Body;

    async fn fetch_metadata(&self, key: &ObjectKey) -> AppResult<Option<ObjectMetadata>>;

    async fn fetch_full(&self, key: &ObjectKey) -> AppResult<Option<Self::Body>>;

    /// Reads `length` bytes starting at `start`. `Ok(None)` when the object is
    /// gone or no longer covers the interval.
    async fn fetch_range(&self, key: &ObjectKey, start: u64, length: u64) -> AppResult<Option<Self::Body>>;
}

/// [`ObjectStore`] backed by an R2 bucket binding.
pub struct R2Store {
    bucket: Bucket,
    key_prefix: String,
}

impl R2Store {
    pub fn new(bucket: Bucket, key_prefix: impl Into<String>) -> Self {
        Self {
            bucket,
            key_prefix: key_prefix.into(),
        }
    }

    fn storage_key(&self, key: &ObjectKey) -> String {
        key.storage_key(&self.key_prefix)
    }

    fn metadata(object: &Object) -> ObjectMetadata {
        let etag = object.http_etag();
        let uploaded = i64::try_from(object.uploaded().as_millis())
            .ok()
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .unwrap_or_default();

        ObjectMetadata {
            size: u64::from(object.size()),
            etag: (!etag.is_empty()).then_some(etag),
            last_modified: uploaded,
        }
    }

    // Hands the R2 ReadableStream through untouched so the runtime keeps its
    // length and cancels the read when the client goes away.
    fn into_body(object: Object) -> AppResult<Option<ResponseBody>> {
        let Some(body) = object.body() else {
            return Ok(None);
        };
        Ok(Some(body.response_body()?))
    }
}

#[async_trait(?Send)]
impl ObjectStore for R2Store {
    type Body = ResponseBody;

    async fn fetch_metadata(&self, key: &ObjectKey) -> AppResult<Option<ObjectMetadata>> {
        let object = self.bucket.head(self.storage_key(key)).await?;
        Ok(object.as_ref().map(Self::metadata))
    }

    async fn fetch_full(&self, key: &ObjectKey) -> AppResult<Option<ResponseBody>> {
        match self.bucket.get(self.storage_key(key)).execute().await? {
            Some(object) => Self::into_body(object),
            None => Ok(None),
        }
    }

    async fn fetch_range(&self, key: &ObjectKey, start: u64, length: u64) -> AppResult<Option<ResponseBody>> {
        let object = match self
            .bucket
            .get(self.storage_key(key))
            .range(Range::OffsetWithLength { offset: start, length })
            .execute()
            .await
        {
            Ok(object) => object,
            Err(e) if is_range_not_satisfiable(&e.to_string()) => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        match object {
            // the object may have been replaced by a shorter one since the HEAD
            Some(object) if u64::from(object.size()) >= start.saturating_add(length) => {
                Self::into_body(object)
            }
            _ => Ok(None),
        }
    }
}

/// R2 rejects a range past the end of the current object with error code
/// 10039 (`InvalidRange`) instead of returning an empty body.
fn is_range_not_satisfiable(message: &str) -> bool {
    message.contains("10039") || message.to_ascii_lowercase().contains("range is not satisfiable")
}
