//! # Audio Gateway - Cloudflare Workers
//!
//! A read-only gateway serving immutable audio objects out of an R2 bucket
//! with HTTP byte ranges, `If-Range` revalidation and a configurable
//! cross-origin policy.
//!
//! ## Architecture
//!
//! - **Router**: Matches `/audio/<fileId>.<ext>` and extracts the object key
//! - **CORS**: Computes allow-origin and the fixed cross-origin headers
//! - **Range / Conditional**: Resolves `Range` and `If-Range` against object metadata
//! - **Storage**: `ObjectStore` seam with the R2-backed implementation
//! - **Handlers**: Assembles status, headers and body for GET/HEAD/OPTIONS
//!
//! The core works on `http` types and is free of worker calls; this module
//! adapts worker requests and responses around it.
//!
//! ## Endpoints
//!
//! ```text
//! GET     /audio/{fileId}.{mp3|m4a}   - Full object or a single byte range
//! HEAD    /audio/{fileId}.{mp3|m4a}   - Same headers, no body
//! OPTIONS /audio/{fileId}.{mp3|m4a}   - CORS preflight
//! ```

use http::header::{HeaderName, HeaderValue, RANGE};
use std::sync::{Arc, OnceLock};
use worker::{event, Context, Env, Error, Request, Response, ResponseBody, Result};

mod conditional;
mod config;
mod constants;
mod cors;
mod errors;
mod handlers;
mod logging;
mod models;
mod range;
mod router;
mod storage;
mod utils;

use config::Config;
use errors::AppError;
use handlers::{failure_response, AudioGateway};
use logging::Logger;
use models::{GatewayBody, GatewayResponse, IncomingRequest};
use storage::R2Store;
use utils::to_worker_headers;

static CONFIG_CACHE: OnceLock<Arc<Config>> = OnceLock::new();

/// Main entry point for the Cloudflare Worker.
///
/// 1. Sets up panic handling
/// 2. Loads the configuration once per isolate
/// 3. Hands the request to [`AudioGateway`] over the configured R2 bucket
/// 4. Logs one structured line per request
///
/// Store and binding failures come back as 503 responses with CORS headers;
/// only failures to read the inbound request or build the outbound one are
/// returned as worker errors.
#[event(fetch)]
pub async fn main(req: Request, env: Env, _ctx: Context) -> Result<Response> {
    console_error_panic_hook::set_once();

    let logger = Logger::new();
    let config = load_config(&env);
    let incoming = incoming_request(&req)?;

    let response = match env.bucket(&config.bucket_binding) {
        Ok(bucket) => {
            let gateway = AudioGateway::new(R2Store::new(bucket, config.key_prefix.clone()), &config);
            gateway.handle(&incoming).await
        }
        Err(e) => failure_response(&incoming, &config, &AppError::from(e)),
    };

    logger.status(
        response.status,
        "audio request",
        log_data!(
            "method" => incoming.method.as_str(),
            "path" => &incoming.path,
            "range" => incoming.header(RANGE),
            "status" => response.status.as_u16(),
            "failure" => &response.failure
        ),
    );

    into_worker_response(response)
}

fn load_config(env: &Env) -> Arc<Config> {
    CONFIG_CACHE
        .get_or_init(|| Arc::new(Config::from_env(env)))
        .clone()
}

fn incoming_request(req: &Request) -> Result<IncomingRequest> {
    let method = http::Method::from_bytes(req.method().to_string().as_bytes())
        .map_err(|e| Error::RustError(format!("invalid method: {}", e)))?;

    let mut incoming = IncomingRequest::new(method, req.path());
    for (name, value) in req.headers().entries() {
        // the runtime only hands us valid headers; anything else is skipped
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(&value),
        ) {
            incoming.headers.append(name, value);
        }
    }
    Ok(incoming)
}

fn into_worker_response(response: GatewayResponse<ResponseBody>) -> Result<Response> {
    let headers = to_worker_headers(&response.headers)?;
    let outbound = match response.body {
        GatewayBody::Empty => Response::empty()?,
        GatewayBody::Text(text) => Response::ok(text)?,
        GatewayBody::Stream(body) => Response::from_body(body)?,
    };
    Ok(outbound
        .with_status(response.status.as_u16())
        .with_headers(headers))
}
