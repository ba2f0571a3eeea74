//! Request routing dispatch module
//!
//! Entry point for HTTP request processing, responsible for method validation, route matching, and dispatching.

use crate::config::AppState;
use crate::handler::{distance, static_files};
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, ACCESS_CONTROL_ALLOW_ORIGIN, IF_NONE_MATCH, SERVER};
use hyper::{Method, Request, Response, StatusCode};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

/// Path of the distance endpoint
pub const DISTANCE_PATH: &str = "/distance";

/// Owned request fields the handlers need, detached from the request body
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub path: String,
    /// Raw query string without the leading `?`
    pub query: Option<String>,
    pub is_head: bool,
    pub if_none_match: Option<String>,
}

impl RequestContext {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        Self {
            path: req.uri().path().to_string(),
            query: req.uri().query().map(ToString::to_string),
            is_head: req.method() == Method::HEAD,
            if_none_match: req
                .headers()
                .get(IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
                .map(ToString::to_string),
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let mut entry = state
        .config
        .logging
        .access_log
        .then(|| AccessLogEntry::from_request(&req, peer));
    let ctx = RequestContext::from_request(&req);

    // 1. Check HTTP method
    let rejected = check_http_method(req.method(), state.config.http.enable_cors);
    drop(req);

    // 2. Dispatch by path
    let mut response = match rejected {
        Some(resp) => resp,
        None => route_request(&ctx, &state).await,
    };

    // 3. Headers every response carries
    add_common_headers(&mut response, &state);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes);
        logger::log_access(entry, &state.access_log_format);
    }

    Ok(response)
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            log::warn!("Method not allowed: {method}");
            Some(http::build_405_response())
        }
    }
}

async fn route_request(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let health_path = &state.config.http.health_path;
    if !health_path.is_empty() && ctx.path == *health_path {
        return http::build_health_response();
    }

    if ctx.path == DISTANCE_PATH {
        return serve_distance(ctx, state).await;
    }

    static_files::serve_directory(ctx, &state.config.static_files).await
}

/// Run the distance handler under the request deadline
///
/// On expiry the handler future, and with it any in-flight lookup, is dropped.
async fn serve_distance(ctx: &RequestContext, state: &AppState) -> Response<Full<Bytes>> {
    let deadline = state.config.performance.request_timeout();
    let answer = distance::handle_distance(
        ctx.query.as_deref(),
        state.geocoder.as_ref(),
        state.config.geocoder.parallel_lookups,
    );

    match tokio::time::timeout(deadline, answer).await {
        Ok(response) => response,
        Err(_) => {
            log::warn!(
                "Distance request timed out after {} seconds",
                deadline.as_secs()
            );
            http::build_text_response(
                StatusCode::GATEWAY_TIMEOUT,
                "timed out while geocoding addresses",
            )
        }
    }
}

fn add_common_headers(response: &mut Response<Full<Bytes>>, state: &AppState) {
    let headers = response.headers_mut();
    if let Some(server) = &state.server_header {
        headers.insert(SERVER, server.clone());
    }
    if state.config.http.enable_cors {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    }
}
