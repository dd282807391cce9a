use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use log::{error, info, warn};

/// Emits one `http_request` event per request with status and latency.
pub(crate) async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let started_at = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = started_at.elapsed().as_millis();
    if status.is_server_error() {
        error!(
            "event=http_request module=server status={} method={} path={} duration_ms={}",
            status.as_u16(),
            method,
            path,
            duration_ms
        );
    } else if status.is_client_error() {
        warn!(
            "event=http_request module=server status={} method={} path={} duration_ms={}",
            status.as_u16(),
            method,
            path,
            duration_ms
        );
    } else {
        info!(
            "event=http_request module=server status={} method={} path={} duration_ms={}",
            status.as_u16(),
            method,
            path,
            duration_ms
        );
    }

    response
}
