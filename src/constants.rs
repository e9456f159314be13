//! # Application Constants
//!
//! This module defines application-wide constants used throughout the audio
//! gateway. Centralizing constants keeps header names and policy values
//! consistent between the CORS engine, the response assembler and the tests.
//!
//! ## Binding Names
//!
//! Constants for Cloudflare Worker bindings and vars that must match wrangler.toml.
//!
//! ## Headers
//!
//! Header names that are not covered by `http::header`.

/// Default R2 bucket binding holding the audio objects
pub const AUDIO_BUCKET_NAME: &str = "AUDIO_BUCKET";

/// Worker var carrying the origin allow-list
pub const VAR_ALLOWED_ORIGINS: &str = "ALLOWED_ORIGINS";

/// Worker var carrying the R2 key prefix
pub const VAR_KEY_PREFIX: &str = "AUDIO_KEY_PREFIX";

/// Worker var overriding the Cache-Control value
pub const VAR_CACHE_CONTROL: &str = "AUDIO_CACHE_CONTROL";

/// Worker var overriding the preflight max-age
pub const VAR_CORS_MAX_AGE: &str = "CORS_MAX_AGE";

/// Path prefix served by the gateway
pub const AUDIO_PATH_PREFIX: &str = "/audio/";

/// Objects are immutable, so caches may keep them for a year
pub const DEFAULT_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Preflight cache lifetime in seconds (24h)
pub const DEFAULT_CORS_MAX_AGE: u32 = 86_400;

/// Wildcard entry in the origin allow-list
pub const CORS_WILDCARD: &str = "*";

/// Methods accepted by the gateway, also used for the `Allow` header on 405
pub const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Request headers always allowed cross-origin
pub const CORS_BASE_ALLOW_HEADERS: &[&str] = &[
    "Range",
    "If-Range",
    "If-None-Match",
    "If-Modified-Since",
    "Content-Type",
];

/// Response headers readable by cross-origin scripts
pub const CORS_EXPOSE_HEADERS: &str = "Accept-Ranges, Content-Length, Content-Range, ETag, Last-Modified";

pub const HEADER_TIMING_ALLOW_ORIGIN: &str = "timing-allow-origin";

pub const HEADER_CROSS_ORIGIN_RESOURCE_POLICY: &str = "cross-origin-resource-policy";

pub const CROSS_ORIGIN_RESOURCE_POLICY: &str = "cross-origin";

pub const RANGE_UNIT_BYTES: &str = "bytes";
