use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiErrorResponse {
    pub detail: ErrorDetail,
}

/// The service reports either a plain string or a `{status, message}` object.
#[derive(Serialize, Deserialize, Debug)]
#[serde(untagged)]
pub enum ErrorDetail {
    Structured {
        status: Option<String>,
        message: String,
    },
    Text(String),
}

impl ErrorDetail {
    pub fn message(self) -> String {
        match self {
            Self::Structured { message, .. } => message,
            Self::Text(message) => message,
        }
    }
}
