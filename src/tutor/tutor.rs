use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    errors::{
        constants::MAX_TUTOR_MESSAGE_LENGTH,
        validation::validate_required_text,
        PoducateError, Result,
    },
    llm::TextGenerator,
    tutor::{prompt::build_tutor_prompt, quiz::QuizQuestion},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TutorAction {
    Explain,
    Quiz,
}

impl std::str::FromStr for TutorAction {
    type Err = PoducateError;

    fn from_str(action: &str) -> Result<Self> {
        match action {
            "explain" => Ok(Self::Explain),
            "quiz" => Ok(Self::Quiz),
            _ => Err(PoducateError::invalid_input("Invalid action specified")),
        }
    }
}

/// Body of `POST /podugenius` before validation.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct TutorRequestBody {
    pub message: Option<String>,
    pub transcript: Option<String>,
    pub action: Option<String>,
    pub podcast_title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TutorRequest {
    pub message: String,
    pub transcript: String,
    pub action: TutorAction,
    pub podcast_title: String,
}

impl TryFrom<TutorRequestBody> for TutorRequest {
    type Error = PoducateError;

    fn try_from(body: TutorRequestBody) -> Result<Self> {
        let action = body
            .action
            .as_deref()
            .ok_or_else(|| PoducateError::invalid_input("Field `action` is required"))?
            .parse()?;

        Ok(Self {
            message: validate_required_text("message", body.message.as_deref(), MAX_TUTOR_MESSAGE_LENGTH)?,
            transcript: body.transcript.unwrap_or_default(),
            action,
            podcast_title: body.podcast_title.unwrap_or_default().trim().to_string(),
        })
    }
}

/// Reply sent back to the chat widget.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TutorResponse {
    pub response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_question: Option<bool>,
}

impl From<QuizQuestion> for TutorResponse {
    fn from(quiz: QuizQuestion) -> Self {
        Self {
            response: quiz.question,
            options: Some(quiz.options),
            correct_answer: Some(quiz.correct_answer),
            explanation: Some(quiz.explanation),
            is_question: Some(true),
        }
    }
}

/// "Podugenius": explains episodes and quizzes the listener on them.
#[derive(Clone)]
pub struct Tutor {
    llm: Arc<dyn TextGenerator>,
    max_tokens: u32,
}

impl Tutor {
    pub fn new(llm: Arc<dyn TextGenerator>, max_tokens: u32) -> Self {
        Self { llm, max_tokens }
    }

    #[tracing::instrument(
        name = "tutor",
        skip(self, request),
        fields(action = ?request.action, title = %request.podcast_title)
    )]
    pub async fn respond(&self, request: &TutorRequest) -> Result<TutorResponse> {
        self.llm.ensure_configured()?;

        let prompt = build_tutor_prompt(request, self.max_tokens);
        let reply = self
            .llm
            .complete(&prompt)
            .await
            .map_err(PoducateError::into_tutor_failure)?
            .ok_or_else(|| PoducateError::tutor(None, "no response from the text generation service"))?;

        match request.action {
            TutorAction::Explain => Ok(TutorResponse {
                response: reply,
                ..Default::default()
            }),
            TutorAction::Quiz => match QuizQuestion::parse(&reply) {
                Ok(quiz) => {
                    info!("Quiz question generated");
                    Ok(quiz.into())
                }
                Err(err) => {
                    warn!(error = %err, "Quiz reply did not match the schema, returning it as text");
                    Ok(TutorResponse {
                        response: reply,
                        is_question: Some(false),
                        ..Default::default()
                    })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockTextGenerator;

    fn request(action: TutorAction) -> TutorRequest {
        TutorRequest {
            message: "Quiz me".into(),
            transcript: "Plants use chlorophyll.".into(),
            action,
            podcast_title: "Photosynthesis 101".into(),
        }
    }

    fn tutor_replying(reply: Option<&str>) -> Tutor {
        let reply = reply.map(String::from);
        let mut llm = MockTextGenerator::new();
        llm.expect_ensure_configured().returning(|| Ok(()));
        llm.expect_complete()
            .withf(|prompt| prompt.max_tokens == 500)
            .times(1)
            .returning(move |_| Ok(reply.clone()));
        Tutor::new(Arc::new(llm), 500)
    }

    #[test]
    fn test_body_validation() {
        let body = TutorRequestBody {
            message: Some("hi".into()),
            action: Some("dance".into()),
            ..Default::default()
        };
        assert!(matches!(
            TutorRequest::try_from(body),
            Err(PoducateError::InvalidInput(_))
        ));

        let body = TutorRequestBody {
            message: Some("hi".into()),
            action: Some("quiz".into()),
            ..Default::default()
        };
        let request = TutorRequest::try_from(body).unwrap();
        assert_eq!(request.action, TutorAction::Quiz);
        assert_eq!(request.transcript, "");
    }

    #[tokio::test]
    async fn test_explain_returns_text() {
        let response = tutor_replying(Some("Chlorophyll captures light."))
            .respond(&request(TutorAction::Explain))
            .await
            .unwrap();
        assert_eq!(response.response, "Chlorophyll captures light.");
        assert_eq!(response.is_question, None);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json, serde_json::json!({"response": "Chlorophyll captures light."}));
    }

    #[tokio::test]
    async fn test_quiz_returns_structured_question() {
        let reply = r#"{"question":"Which pigment?","options":["A1","B1","C1","D1"],"correctAnswer":"3","explanation":"Because."}"#;
        let response = tutor_replying(Some(reply))
            .respond(&request(TutorAction::Quiz))
            .await
            .unwrap();

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["response"], "Which pigment?");
        assert_eq!(json["correctAnswer"], "3");
        assert_eq!(json["isQuestion"], true);
        assert_eq!(json["options"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_quiz_schema_failure_falls_back_to_text() {
        let reply = "That's correct! Chlorophyll is the answer.";
        let response = tutor_replying(Some(reply))
            .respond(&request(TutorAction::Quiz))
            .await
            .unwrap();

        assert_eq!(response.response, reply);
        assert_eq!(response.is_question, Some(false));
        assert_eq!(response.correct_answer, None);
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_error() {
        let err = tutor_replying(None)
            .respond(&request(TutorAction::Explain))
            .await
            .unwrap_err();
        assert!(matches!(err, PoducateError::Tutor { .. }));
    }
}
