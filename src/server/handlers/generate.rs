use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, StatusCode},
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::{
    errors::{PoducateError, Result},
    generation::{stream::podcast_body, GenerationRequest, GenerationRequestBody},
    server::state::AppState,
};

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// `POST /generate-podcast`
///
/// Nothing is written to the client until both the script and the start of
/// the audio are available, so every pipeline error still gets a proper
/// status code. Once streaming starts, errors abort the body instead.
pub async fn generate_podcast(
    State(state): State<AppState>,
    payload: std::result::Result<Json<GenerationRequestBody>, JsonRejection>,
) -> Result<Response> {
    let Json(body) = payload?;
    let request = GenerationRequest::try_from(body)?;

    let request_id = Uuid::new_v4();
    let result = state.pipeline.generate_with_id(request_id, &request).await?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(REQUEST_ID_HEADER, request_id.to_string())
        .body(Body::from_stream(podcast_body(result)?))
        .map_err(|e| PoducateError::Unknown(format!("Failed to build response: {}", e)))
}
