//! Standalone server for the Citta reformatting proxy
//!
//! Serves `POST /api/process-text` and the static front-end.

pub mod env;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use axum::{Router, body::Body, http::Request, routing::any};
use citta::{GenerativeModel, TextProxy};
use tower_http::{services::ServeDir, trace::TraceLayer};

pub use env::Env;
pub use routes::PROCESS_TEXT_PATH;

pub fn app<M>(proxy: Arc<TextProxy<M>>, static_dir: impl AsRef<Path>) -> Router
where
    M: GenerativeModel + 'static,
{
    Router::new()
        .route(PROCESS_TEXT_PATH, any(routes::process_text::<M>))
        .with_state(proxy)
        .fallback_service(ServeDir::new(static_dir.as_ref()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                })
                .on_request(|request: &Request<Body>, _span: &tracing::Span| {
                    tracing::info!(
                        method = %request.method(),
                        path = %request.uri().path(),
                        "http_request_started"
                    );
                })
                .on_response(
                    |response: &axum::http::Response<Body>,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::info!(
                            http_status = %response.status().as_u16(),
                            latency_ms = %latency.as_millis(),
                            "http_request_finished"
                        );
                    },
                ),
        )
}
