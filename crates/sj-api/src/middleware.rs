//! Request correlation for the API server.
//!
//! Every request carries an `X-Request-Id`: the caller's, or a fresh UUID.
//! The id is stamped on the request before tracing sees it, so the per-request
//! span opened by `TraceLayer` and every pipeline log inside it share it.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::{info_span, Span};
use uuid::Uuid;

/// Request ID header name.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Ensures the request has an id and echoes it on the response.
pub async fn request_id(mut request: Request, next: Next) -> Response {
    let existing = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .filter(|value| value.to_str().is_ok())
        .cloned();

    let id = match existing {
        Some(value) => value,
        None => {
            let generated = Uuid::new_v4().to_string();
            // A hyphenated UUID is always a valid header value.
            let value = HeaderValue::from_str(&generated)
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"));
            request.headers_mut().insert(REQUEST_ID_HEADER, value.clone());
            value
        }
    };

    let mut response = next.run(request).await;
    response.headers_mut().insert(REQUEST_ID_HEADER, id);
    response
}

/// Span for one HTTP request, tagged with its request id.
pub fn request_span(request: &Request) -> Span {
    let request_id = request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");

    info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

