use axum::{extract::State, Json};
use serde::Serialize;

use crate::{
    errors::{PoducateError, Result},
    server::state::AppState,
};

#[derive(Serialize, Debug)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Serialize, Debug)]
pub struct DatastoreTime {
    /// RFC 3339, UTC.
    pub time: String,
}

/// `GET /health`
#[tracing::instrument(name = "health")]
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `GET /test-db`
#[tracing::instrument(name = "test_db", skip_all)]
pub async fn test_db(State(state): State<AppState>) -> Result<Json<DatastoreTime>> {
    let datastore = state
        .datastore
        .as_ref()
        .ok_or(PoducateError::DatabaseNotConfigured)?;

    let now = datastore.now().await?;
    Ok(Json(DatastoreTime {
        time: humantime::format_rfc3339_millis(now).to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{database::MockDatastore, server::handlers::tests::idle_state};
    use axum::{http::StatusCode, response::IntoResponse};
    use std::{
        sync::Arc,
        time::{Duration, UNIX_EPOCH},
    };

    #[tokio::test]
    async fn test_reports_datastore_time() {
        let mut datastore = MockDatastore::new();
        datastore
            .expect_now()
            .returning(|| Ok(UNIX_EPOCH + Duration::from_millis(1_700_000_000_123)));

        let mut state = idle_state();
        state.datastore = Some(Arc::new(datastore));

        let Json(body) = test_db(State(state)).await.unwrap();
        assert_eq!(body.time, "2023-11-14T22:13:20.123Z");
    }

    #[tokio::test]
    async fn test_unconfigured_datastore_is_unavailable() {
        let response = test_db(State(idle_state())).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_datastore_failure_is_server_error() {
        let mut datastore = MockDatastore::new();
        datastore
            .expect_now()
            .returning(|| Err(PoducateError::database("connection refused")));

        let mut state = idle_state();
        state.datastore = Some(Arc::new(datastore));

        let response = test_db(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
