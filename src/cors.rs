//! # Cross-Origin Policy
//!
//! Computes the CORS headers attached to every gateway response, including
//! error responses, so browsers can always read the status code.
//!
//! ## Allow-Origin Rules
//!
//! - No allow-list configured: reflect the request `Origin`, or `*` without one
//! - Allow-list contains `*`: `*`
//! - Request `Origin` exactly matches an entry: reflect it
//! - Otherwise: omit `Access-Control-Allow-Origin` and let the browser block the read
//!
//! The remaining headers are fixed and always present.

use http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS,
    ACCESS_CONTROL_MAX_AGE, VARY,
};

use crate::constants::{
    ALLOWED_METHODS, CORS_BASE_ALLOW_HEADERS, CORS_EXPOSE_HEADERS, CORS_WILDCARD,
    CROSS_ORIGIN_RESOURCE_POLICY, DEFAULT_CORS_MAX_AGE, HEADER_CROSS_ORIGIN_RESOURCE_POLICY,
    HEADER_TIMING_ALLOW_ORIGIN,
};

/// Configured origin policy. Built once from config and shared by every request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsPolicy {
    /// `None` when no allow-list is configured.
    allowed_origins: Option<Vec<String>>,
    max_age: u32,
}

/// Per-request outcome of the policy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsDecision {
    /// `None` means the allow-origin header is omitted.
    pub allow_origin: Option<String>,
    pub allow_headers: Vec<String>,
    pub max_age: u32,
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self {
            allowed_origins: None,
            max_age: DEFAULT_CORS_MAX_AGE,
        }
    }
}

impl CorsPolicy {
    /// Parses a whitespace or comma separated allow-list.
    ///
    /// A missing or blank value means no allow-list is configured.
    ///
    /// # Example
    ///
    /// ```rust
    /// let policy = CorsPolicy::from_allow_list(Some("https://a.com, https://b.com"), 600);
    /// ```
    pub fn from_allow_list(raw: Option<&str>, max_age: u32) -> Self {
        let entries: Vec<String> = raw
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|entry| !entry.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            allowed_origins: (!entries.is_empty()).then_some(entries),
            max_age,
        }
    }

    fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        let Some(allowed) = &self.allowed_origins else {
            return Some(origin.unwrap_or(CORS_WILDCARD).to_string());
        };

        if allowed.iter().any(|entry| entry == CORS_WILDCARD) {
            return Some(CORS_WILDCARD.to_string());
        }

        origin
            .filter(|origin| allowed.iter().any(|entry| entry == origin))
            .map(str::to_string)
    }

    /// Decision for an actual (non-preflight) request.
    pub fn decide(&self, origin: Option<&str>) -> CorsDecision {
        CorsDecision {
            allow_origin: self.allow_origin(origin),
            allow_headers: base_allow_headers(),
            max_age: self.max_age,
        }
    }

    /// Decision for a preflight; requested headers are merged into the base set.
    pub fn decide_preflight(&self, origin: Option<&str>, requested_headers: Option<&str>) -> CorsDecision {
        let mut decision = self.decide(origin);

        for requested in requested_headers
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
        {
            if !decision
                .allow_headers
                .iter()
                .any(|known| known.eq_ignore_ascii_case(requested))
            {
                decision.allow_headers.push(requested.to_string());
            }
        }

        decision
    }
}

impl CorsDecision {
    /// Writes the decision into a response header map.
    ///
    /// Values that cannot be represented as header values (a reflected origin
    /// with control characters) are skipped rather than failing the response.
    pub fn apply(&self, headers: &mut HeaderMap) {
        if let Some(origin) = &self.allow_origin {
            if let Ok(value) = HeaderValue::from_str(origin) {
                headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, value);
            }
        }

        headers.insert(VARY, HeaderValue::from_static("Origin"));
        headers.insert(ACCESS_CONTROL_ALLOW_METHODS, HeaderValue::from_static(ALLOWED_METHODS));
        if let Ok(value) = HeaderValue::from_str(&self.allow_headers.join(", ")) {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, value);
        }
        headers.insert(
            ACCESS_CONTROL_EXPOSE_HEADERS,
            HeaderValue::from_static(CORS_EXPOSE_HEADERS),
        );
        headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from(self.max_age));
        headers.insert(
            HeaderName::from_static(HEADER_TIMING_ALLOW_ORIGIN),
            HeaderValue::from_static(CORS_WILDCARD),
        );
        headers.insert(
            HeaderName::from_static(HEADER_CROSS_ORIGIN_RESOURCE_POLICY),
            HeaderValue::from_static(CROSS_ORIGIN_RESOURCE_POLICY),
        );
    }
}

fn base_allow_headers() -> Vec<String> {
    CORS_BASE_ALLOW_HEADERS.iter().map(|h| h.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reflects_origin_without_allow_list() {
        let policy = CorsPolicy::from_allow_list(None, 600);
        assert_eq!(
            policy.decide(Some("https://a.com")).allow_origin.as_deref(),
            Some("https://a.com")
        );
        assert_eq!(policy.decide(None).allow_origin.as_deref(), Some("*"));
    }

    #[test]
    fn blank_allow_list_counts_as_unconfigured() {
        let policy = CorsPolicy::from_allow_list(Some("  , "), 600);
        assert_eq!(policy, CorsPolicy::from_allow_list(None, 600));
    }

    #[test]
    fn wildcard_entry_allows_everyone() {
        let policy = CorsPolicy::from_allow_list(Some("https://b.com *"), 600);
        assert_eq!(
            policy.decide(Some("https://a.com")).allow_origin.as_deref(),
            Some("*")
        );
    }

    #[test]
    fn listed_origin_is_reflected_and_others_omitted() {
        let policy = CorsPolicy::from_allow_list(Some("https://b.com,https://c.com"), 600);
        assert_eq!(
            policy.decide(Some("https://c.com")).allow_origin.as_deref(),
            Some("https://c.com")
        );
        assert_eq!(policy.decide(Some("https://a.com")).allow_origin, None);
        assert_eq!(policy.decide(None).allow_origin, None);
    }

    #[test]
    fn preflight_merges_requested_headers_once() {
        let policy = CorsPolicy::default();
        let decision = policy.decide_preflight(None, Some("X-Custom, range, X-Custom, "));
        assert_eq!(
            decision.allow_headers,
            vec![
                "Range",
                "If-Range",
                "If-None-Match",
                "If-Modified-Since",
                "Content-Type",
                "X-Custom"
            ]
        );
    }

    #[test]
    fn apply_writes_fixed_headers() {
        let decision = CorsPolicy::from_allow_list(Some("https://b.com"), 600).decide(Some("https://a.com"));
        let mut headers = HeaderMap::new();
        decision.apply(&mut headers);

        assert!(headers.get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
        assert_eq!(headers[VARY], "Origin");
        assert_eq!(headers[ACCESS_CONTROL_ALLOW_METHODS], "GET, HEAD, OPTIONS");
        assert_eq!(
            headers[ACCESS_CONTROL_ALLOW_HEADERS],
            "Range, If-Range, If-None-Match, If-Modified-Since, Content-Type"
        );
        assert_eq!(headers[ACCESS_CONTROL_EXPOSE_HEADERS], CORS_EXPOSE_HEADERS);
        assert_eq!(headers[ACCESS_CONTROL_MAX_AGE], "600");
        assert_eq!(headers[HEADER_TIMING_ALLOW_ORIGIN], "*");
        assert_eq!(headers[HEADER_CROSS_ORIGIN_RESOURCE_POLICY], "cross-origin");
    }
}
