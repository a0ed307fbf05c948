use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use citta::{GenerativeModel, ProxyRequest, ProxyResponse, TextProxy};

pub const PROCESS_TEXT_PATH: &str = "/api/process-text";

/// Accepts every method so non-POST requests get the JSON 405 envelope
pub async fn process_text<M>(
    State(proxy): State<Arc<TextProxy<M>>>,
    method: Method,
    body: Bytes,
) -> Response
where
    M: GenerativeModel + 'static,
{
    let response = proxy
        .handle(ProxyRequest::new(method.as_str(), body.to_vec()))
        .await;
    into_response(response)
}

fn into_response(response: ProxyResponse) -> Response {
    let status =
        StatusCode::from_u16(response.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(response.body)).into_response()
}
