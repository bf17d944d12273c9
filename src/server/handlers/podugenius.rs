use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::{
    errors::{PoducateError, Result},
    server::state::AppState,
    tutor::{TutorRequest, TutorRequestBody, TutorResponse},
};

/// `POST /podugenius`
pub async fn podugenius(
    State(state): State<AppState>,
    payload: std::result::Result<Json<TutorRequestBody>, JsonRejection>,
) -> Result<Json<TutorResponse>> {
    let Json(body) = payload?;
    let request = TutorRequest::try_from(body)?;

    let response = tokio::time::timeout(state.timeout, state.tutor.respond(&request))
        .await
        .map_err(|_| PoducateError::Timeout {
            stage: "waiting for the tutor",
        })??;

    Ok(Json(response))
}
