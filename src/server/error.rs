use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::errors::{
    constants::{GENERIC_ERROR_MESSAGE, UPSTREAM_AUTH_MESSAGE},
    PoducateError,
};

#[derive(Serialize, Debug)]
struct ErrorBody<'a> {
    error: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    script: Option<&'a str>,
}

impl PoducateError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::DatabaseNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => match self.upstream_status() {
                Some(401 | 403) => StatusCode::UNAUTHORIZED,
                Some(status) => StatusCode::from_u16(status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                None => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn is_upstream_auth_failure(&self) -> bool {
        matches!(self.upstream_status(), Some(401 | 403))
    }
}

impl From<JsonRejection> for PoducateError {
    fn from(rejection: JsonRejection) -> Self {
        PoducateError::invalid_input(rejection.body_text())
    }
}

impl IntoResponse for PoducateError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            error!(status = status.as_u16(), code = self.code(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), code = self.code(), error = %self, "Request rejected");
        }

        let (message, details) = if self.is_upstream_auth_failure() {
            (UPSTREAM_AUTH_MESSAGE.to_string(), Some(self.to_string()))
        } else {
            match &self {
                PoducateError::Io(_) | PoducateError::Unknown(_) => {
                    (GENERIC_ERROR_MESSAGE.to_string(), Some(self.to_string()))
                }
                _ => (self.to_string(), None),
            }
        };

        let body = ErrorBody {
            error: self.code(),
            message,
            details,
            script: self.partial_script(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (PoducateError::invalid_input("x"), 400),
            (PoducateError::Timeout { stage: "x" }, 504),
            (PoducateError::DatabaseNotConfigured, 503),
            (PoducateError::missing_credentials("speech synthesis"), 500),
            (PoducateError::script_generation(Some(401), "x"), 401),
            (PoducateError::script_generation(Some(403), "x"), 401),
            (PoducateError::script_generation(Some(429), "x"), 429),
            (PoducateError::upstream("text generation", Some(404), "x"), 404),
            (PoducateError::upstream("text generation", Some(200), "x"), 500),
            (PoducateError::tutor(None, "x"), 500),
            (PoducateError::database("x"), 500),
        ];

        for (err, status) in cases {
            assert_eq!(err.status_code().as_u16(), status, "{err}");
        }
    }

    #[tokio::test]
    async fn test_audio_failure_body_carries_script() {
        let err = PoducateError::AudioSynthesis {
            script: "Hello listeners.".into(),
            status: Some(429),
            message: "quota exceeded".into(),
        };

        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);

        let json = body_json(response).await;
        assert_eq!(json["error"], "audio_synthesis_failed");
        assert_eq!(json["script"], "Hello listeners.");
        assert!(json.get("details").is_none());
    }

    #[tokio::test]
    async fn test_upstream_auth_failure_uses_fixed_message() {
        let response = PoducateError::script_generation(Some(401), "Incorrect API key").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let json = body_json(response).await;
        assert_eq!(json["message"], UPSTREAM_AUTH_MESSAGE);
        assert!(json["details"].as_str().unwrap().contains("Incorrect API key"));
        assert!(json.get("script").is_none());
    }
}
