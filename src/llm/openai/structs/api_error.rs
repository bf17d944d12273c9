use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub error: ApiError,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiError {
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
}
