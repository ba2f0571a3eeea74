//! HTTP response building module
//!
//! Builders for every status the service answers with. None of them panic:
//! a builder failure is logged and replaced by an empty response.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{HeaderValue, ALLOW};
use hyper::{Response, StatusCode};

/// Plain-text response, used for every error the client should read
pub fn build_text_response(status: StatusCode, message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "text/plain; charset=utf-8")
        .header("X-Content-Type-Options", "nosniff")
        .body(Full::new(Bytes::from(format!("{message}\n"))))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// JSON response from an already serialized body
pub fn build_json_response(status: StatusCode, json: String) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Cache-Control", "no-store")
        .body(Full::new(Bytes::from(json)))
        .unwrap_or_else(|e| {
            log_build_error(status.as_str(), &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 304 Not Modified response
pub fn build_304_response(etag: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::NOT_MODIFIED)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    build_text_response(StatusCode::NOT_FOUND, "404 Not Found")
}

/// Build 405 Method Not Allowed response
pub fn build_405_response() -> Response<Full<Bytes>> {
    let mut response =
        build_text_response(StatusCode::METHOD_NOT_ALLOWED, "405 Method Not Allowed");
    response
        .headers_mut()
        .insert(ALLOW, HeaderValue::from_static("GET, HEAD, OPTIONS"));
    response
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(enable_cors: bool) -> Response<Full<Bytes>> {
    let mut builder = Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Allow", "GET, HEAD, OPTIONS");

    if enable_cors {
        builder = builder
            .header("Access-Control-Allow-Methods", "GET, HEAD, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .header("Access-Control-Max-Age", "86400");
    }

    builder.body(Full::new(Bytes::new())).unwrap_or_else(|e| {
        log_build_error("OPTIONS", &e);
        Response::new(Full::new(Bytes::new()))
    })
}

/// Liveness probe response
pub fn build_health_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-store")
        .body(Full::new(Bytes::from_static(b"ok")))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from_static(b"ok")))
        })
}

/// Static file response with revalidation headers
pub fn build_cached_response(
    data: Bytes,
    content_type: &str,
    etag: &str,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let content_length = data.len();
    let body = if is_head { Bytes::new() } else { data };

    Response::builder()
        .status(StatusCode::OK)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    log::error!("Failed to build {status} response: {error}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_response() {
        let resp = build_text_response(StatusCode::BAD_REQUEST, "missing address1");
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn test_405_lists_allowed_methods() {
        let resp = build_405_response();
        assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(resp.headers()["Allow"], "GET, HEAD, OPTIONS");
    }

    #[test]
    fn test_options_cors_headers() {
        let plain = build_options_response(false);
        assert_eq!(plain.status(), StatusCode::NO_CONTENT);
        assert!(!plain.headers().contains_key("Access-Control-Allow-Methods"));

        let cors = build_options_response(true);
        assert!(cors.headers().contains_key("Access-Control-Allow-Methods"));
    }

    #[test]
    fn test_head_has_length_but_no_body() {
        use hyper::body::Body;

        let resp = build_cached_response(
            Bytes::from_static(b"<html></html>"),
            "text/html",
            "\"e\"",
            true,
        );
        assert_eq!(resp.headers()["Content-Length"], "13");
        assert_eq!(resp.body().size_hint().exact(), Some(0));
    }
}
