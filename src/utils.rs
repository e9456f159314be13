//! # Utility Functions
//!
//! Helpers shared by the assembler and the worker glue:
//!
//! - **HTTP dates**: formatting `Last-Modified` and parsing validator dates
//! - **Fallback ETags**: a stable validator for objects the store reports without one
//! - **Header conversion**: copying an `http::HeaderMap` into worker `Headers`

use chrono::{DateTime, Utc};
use http::HeaderMap;
use sha2::{Digest, Sha256};
use worker::Headers;

use crate::models::ObjectKey;

/// Formats a timestamp as an IMF-fixdate, e.g. `Wed, 21 Oct 2015 07:28:00 GMT`.
pub fn format_http_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Parses any of the three HTTP date formats, falling back to RFC 3339.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    httpdate::parse_http_date(value)
        .ok()
        .map(DateTime::<Utc>::from)
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|parsed| parsed.with_timezone(&Utc))
        })
}

/// Builds a strong ETag from the object key and size.
///
/// Only used when the store has no entity tag for the object. The value is
/// stable for as long as the object keeps its key and size.
///
/// # Example
///
/// ```rust
/// let etag = synthesize_etag(&key, 1000);
/// // Returns: "\"5f0c...\"" (32 hex characters between quotes)
/// ```
pub fn synthesize_etag(key: &ObjectKey, size: u64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.to_string().as_bytes());
    hasher.update(b":");
    hasher.update(size.to_string().as_bytes());
    let digest = hex::encode(hasher.finalize());
    format!("\"{}\"", &digest[..32])
}

/// Copies gateway headers into a worker `Headers` object.
pub fn to_worker_headers(source: &HeaderMap) -> worker::Result<Headers> {
    let headers = Headers::new();
    for (name, value) in source {
        let value = value
            .to_str()
            .map_err(|e| worker::Error::RustError(format!("invalid header {}: {}", name, e)))?;
        headers.append(name.as_str(), value)?;
    }
    Ok(headers)
}
