use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use log::{error, info};
use std::time::Instant;

/// Log method, path, status and latency of every request
pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
    if status.is_server_error() {
        error!("{} {} -> {} ({:.1}ms)", method, path, status.as_u16(), elapsed_ms);
    } else {
        info!("{} {} -> {} ({:.1}ms)", method, path, status.as_u16(), elapsed_ms);
    }

    response
}
