//! # Audio Request Handling
//!
//! Assembles the response for `/audio/<fileId>.<ext>` requests.
//!
//! ## Request Flow
//!
//! ```text
//! match path → compute CORS → OPTIONS? → 204 preflight
//!                           → GET/HEAD → fetch metadata → If-Range + Range → 200 / 206 / 416
//!                           → other    → 405
//! ```
//!
//! Every response, including errors, carries the CORS headers. Object headers
//! (`ETag`, `Last-Modified`, ...) are only sent for found objects.
//!
//! ## Range Policy
//!
//! A `Range` header that is honored by `If-Range` but does not resolve to a
//! satisfiable interval yields 416 for `HEAD`, while `GET` falls back to the
//! full object. A `GET` whose resolved interval the store refuses also yields 416.

use http::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT_RANGES, ACCESS_CONTROL_REQUEST_HEADERS, ALLOW,
    CACHE_CONTROL, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, ETAG, IF_RANGE, LAST_MODIFIED,
    ORIGIN, RANGE,
};
use http::{Method, StatusCode};

use crate::conditional::should_honor_range;
use crate::config::Config;
use crate::constants::{ALLOWED_METHODS, RANGE_UNIT_BYTES};
use crate::cors::{CorsDecision, CorsPolicy};
use crate::errors::{AppError, AppResult};
use crate::models::{GatewayBody, GatewayResponse, IncomingRequest, ObjectKey, RangeSpec};
use crate::range::parse_range;
use crate::router::match_audio_path;
use crate::storage::ObjectStore;
use crate::utils::{format_http_date, synthesize_etag};

/// Stateless request handler over an object store.
///
/// Built per isolate from an explicit [`Config`]; holds nothing that changes
/// between requests.
pub struct AudioGateway<S> {
    store: S,
    cors: CorsPolicy,
    cache_control: String,
}

impl<S: ObjectStore> AudioGateway<S> {
    pub fn new(store: S, config: &Config) -> Self {
        Self {
            store,
            cors: config.cors_policy(),
            cache_control: config.cache_control.clone(),
        }
    }

    /// Produces the complete response for one request. Never fails: store
    /// problems become 503 responses.
    pub async fn handle(&self, req: &IncomingRequest) -> GatewayResponse<S::Body> {
        let is_head = req.method == Method::HEAD;
        let origin = req.header(ORIGIN);
        let cors = if req.method == Method::OPTIONS {
            self.cors
                .decide_preflight(origin, req.header(ACCESS_CONTROL_REQUEST_HEADERS))
        } else {
            self.cors.decide(origin)
        };

        let key = match match_audio_path(&req.path) {
            Ok(key) => key,
            Err(error) => return error_response(&error, &cors, is_head),
        };

        let result = match req.method {
            Method::OPTIONS => Ok(preflight_response(&cors)),
            Method::GET | Method::HEAD => self.serve(req, &key, &cors, is_head).await,
            ref other => Err(AppError::MethodNotAllowed {
                method: other.to_string(),
            }),
        };

        result.unwrap_or_else(|error| error_response(&error, &cors, is_head))
    }

    async fn serve(
        &self,
        req: &IncomingRequest,
        key: &ObjectKey,
        cors: &CorsDecision,
        is_head: bool,
    ) -> AppResult<GatewayResponse<S::Body>> {
        let metadata = self
            .store
            .fetch_metadata(key)
            .await?
            .ok_or_else(|| AppError::NotFound { key: key.to_string() })?;
        let size = metadata.size;

        let etag = metadata
            .etag
            .clone()
            .unwrap_or_else(|| synthesize_etag(key, size));
        let last_modified = format_http_date(&metadata.last_modified);

        let mut headers = HeaderMap::new();
        cors.apply(&mut headers);
        headers.insert(ACCEPT_RANGES, HeaderValue::from_static(RANGE_UNIT_BYTES));
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static(key.extension.content_type()),
        );
        set_text(&mut headers, CACHE_CONTROL, &self.cache_control);
        set_text(&mut headers, ETAG, &etag);
        set_text(&mut headers, LAST_MODIFIED, &last_modified);

        // Some(None): a range was asked for and honored, but is not satisfiable.
        let requested: Option<Option<RangeSpec>> = req
            .header(RANGE)
            .filter(|_| should_honor_range(req.header(IF_RANGE), &etag, &last_modified))
            .map(|value| parse_range(value, size));

        match requested {
            Some(Some(range)) => {
                let body = if is_head {
                    GatewayBody::Empty
                } else {
                    let stream = self
                        .store
                        .fetch_range(key, range.start, range.length)
                        .await?
                        .ok_or(AppError::RangeNotSatisfiable { size })?;
                    GatewayBody::Stream(stream)
                };
                set_text(&mut headers, CONTENT_RANGE, &range.content_range(size));
                headers.insert(CONTENT_LENGTH, HeaderValue::from(range.length));
                Ok(GatewayResponse {
                    status: StatusCode::PARTIAL_CONTENT,
                    headers,
                    body,
                    failure: None,
                })
            }
            Some(None) if is_head => Err(AppError::RangeNotSatisfiable { size }),
            _ => {
                let body = if is_head {
                    GatewayBody::Empty
                } else {
                    let stream = self
                        .store
                        .fetch_full(key)
                        .await?
                        .ok_or_else(|| AppError::NotFound { key: key.to_string() })?;
                    GatewayBody::Stream(stream)
                };
                headers.insert(CONTENT_LENGTH, HeaderValue::from(size));
                Ok(GatewayResponse {
                    status: StatusCode::OK,
                    headers,
                    body,
                    failure: None,
                })
            }
        }
    }
}

fn preflight_response<B>(cors: &CorsDecision) -> GatewayResponse<B> {
    let mut headers = HeaderMap::new();
    cors.apply(&mut headers);
    GatewayResponse {
        status: StatusCode::NO_CONTENT,
        headers,
        body: GatewayBody::Empty,
        failure: None,
    }
}

fn error_response<B>(error: &AppError, cors: &CorsDecision, is_head: bool) -> GatewayResponse<B> {
    let mut headers = HeaderMap::new();
    cors.apply(&mut headers);

    match error {
        AppError::MethodNotAllowed { .. } => {
            headers.insert(ALLOW, HeaderValue::from_static(ALLOWED_METHODS));
        }
        AppError::RangeNotSatisfiable { size } => {
            set_text(&mut headers, CONTENT_RANGE, &format!("bytes */{}", size));
        }
        _ => {}
    }

    let body = if is_head {
        GatewayBody::Empty
    } else {
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        GatewayBody::Text(error.public_message())
    };

    GatewayResponse {
        status: error.status(),
        headers,
        body,
        failure: Some(error.to_string()),
    }
}

/// Error response for failures that occur before a gateway can be built,
/// such as a missing bucket binding.
pub fn failure_response<B>(req: &IncomingRequest, config: &Config, error: &AppError) -> GatewayResponse<B> {
    let cors = config.cors_policy().decide(req.header(ORIGIN));
    error_response(error, &cors, req.method == Method::HEAD)
}

// Store-provided or configured text that is not a valid header value is dropped.
fn set_text(headers: &mut HeaderMap, name: HeaderName, value: &str) {
    if let Ok(value) = HeaderValue::from_str(value) {
        headers.insert(name, value);
    }
}
