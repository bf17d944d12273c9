use serde::{Deserialize, Serialize};

use crate::errors::{
    constants::*,
    validation::{validate_difficulty, validate_optional_text, validate_required_text},
    PoducateError, Result,
};

/// Body of `POST /generate-podcast` as sent by the client, before validation.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct GenerationRequestBody {
    pub topic: Option<String>,
    pub subject: Option<String>,
    pub style: Option<String>,
    pub difficulty: Option<i64>,
    pub context: Option<String>,
}

/// Validated generation parameters.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub topic: String,
    pub subject: String,
    pub style: String,
    pub difficulty: u8,
    pub context: Option<String>,
}

impl TryFrom<GenerationRequestBody> for GenerationRequest {
    type Error = PoducateError;

    fn try_from(body: GenerationRequestBody) -> Result<Self> {
        Ok(Self {
            topic: validate_required_text("topic", body.topic.as_deref(), MAX_TOPIC_LENGTH)?,
            subject: validate_required_text("subject", body.subject.as_deref(), MAX_SUBJECT_LENGTH)?,
            style: validate_required_text("style", body.style.as_deref(), MAX_STYLE_LENGTH)?,
            difficulty: validate_difficulty(body.difficulty)?,
            context: validate_optional_text("context", body.context.as_deref(), MAX_CONTEXT_LENGTH)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body() -> GenerationRequestBody {
        serde_json::from_str(
            r#"{"topic":"Photosynthesis","subject":"Science","style":"Beginner's Guide","difficulty":3}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_valid_body() {
        let request = GenerationRequest::try_from(body()).unwrap();
        assert_eq!(request.topic, "Photosynthesis");
        assert_eq!(request.difficulty, 3);
        assert_eq!(request.context, None);
    }

    #[test]
    fn test_missing_topic_rejected() {
        let body = GenerationRequestBody {
            topic: None,
            ..body()
        };
        let err = GenerationRequest::try_from(body).unwrap_err();
        assert!(matches!(err, PoducateError::InvalidInput(ref m) if m.contains("topic")));
    }

    #[test]
    fn test_difficulty_out_of_range_rejected() {
        let body = GenerationRequestBody {
            difficulty: Some(11),
            ..body()
        };
        assert!(GenerationRequest::try_from(body).is_err());
    }

    #[test]
    fn test_blank_context_dropped() {
        let body = GenerationRequestBody {
            context: Some("   ".into()),
            ..body()
        };
        assert_eq!(GenerationRequest::try_from(body).unwrap().context, None);
    }
}
