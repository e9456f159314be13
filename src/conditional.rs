//! # If-Range Evaluation
//!
//! Decides whether a `Range` header still applies to the current object
//! version. When it does not, the full object is served instead.

use crate::utils::parse_http_date;

/// Returns `true` when the accompanying `Range` header should be honored.
///
/// - No `If-Range`: honored.
/// - Entity tag (`"..."` or `W/"..."`): honored only on an exact string match
///   with the current ETag.
/// - Anything else is read as an HTTP date and honored when it is not older
///   than `last_modified`. If either side fails to parse, the range is honored.
pub fn should_honor_range(if_range: Option<&str>, etag: &str, last_modified: &str) -> bool {
    let Some(if_range) = if_range.map(str::trim) else {
        return true;
    };

    if if_range.starts_with('"') || if_range.starts_with("W/\"") {
        return if_range == etag;
    }

    match (parse_http_date(if_range), parse_http_date(last_modified)) {
        (Some(validator), Some(modified)) => validator >= modified,
        _ => true,
    }
}
