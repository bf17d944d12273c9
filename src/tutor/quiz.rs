use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{constants::QUIZ_OPTION_COUNT, PoducateError, Result};

/// A markdown code fence wrapped around the whole reply.
static CODE_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^\s*```[a-zA-Z]*\s*(.*?)\s*```\s*$").expect("code fence pattern is valid")
});

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    /// Index of the correct option, `"0"` to `"3"`.
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAnswer {
    Index(u64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuiz {
    question: String,
    options: Vec<String>,
    correct_answer: RawAnswer,
    explanation: String,
}

impl QuizQuestion {
    /// Parse a model reply against the quiz schema.
    ///
    /// The reply must be a single JSON object (optionally inside a code
    /// fence) with a non-empty question, exactly four non-empty options and
    /// an answer index in range. Nothing is guessed from free text.
    pub fn parse(reply: &str) -> Result<Self> {
        let json = match CODE_FENCE.captures(reply) {
            Some(captures) => captures.get(1).map_or("", |m| m.as_str()),
            None => reply.trim(),
        };

        let raw: RawQuiz = serde_json::from_str(json)?;

        if raw.question.trim().is_empty() {
            return Err(PoducateError::invalid_input("quiz question is empty"));
        }

        if raw.options.len() != QUIZ_OPTION_COUNT
            || raw.options.iter().any(|option| option.trim().is_empty())
        {
            return Err(PoducateError::invalid_input(format!(
                "quiz must have exactly {} non-empty options",
                QUIZ_OPTION_COUNT
            )));
        }

        let index = match raw.correct_answer {
            RawAnswer::Index(index) => usize::try_from(index).ok(),
            RawAnswer::Text(text) => text.trim().parse::<usize>().ok(),
        }
        .filter(|index| *index < QUIZ_OPTION_COUNT)
        .ok_or_else(|| PoducateError::invalid_input("quiz answer is not a valid option index"))?;

        Ok(Self {
            question: raw.question.trim().to_string(),
            options: raw.options.into_iter().map(|o| o.trim().to_string()).collect(),
            correct_answer: index.to_string(),
            explanation: raw.explanation.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{
        "question": "What pigment captures light?",
        "options": ["Chlorophyll", "Keratin", "Melanin", "Hemoglobin"],
        "correctAnswer": "0",
        "explanation": "Chlorophyll absorbs red and blue light."
    }"#;

    #[test]
    fn test_parse_valid_quiz() {
        let quiz = QuizQuestion::parse(VALID).unwrap();
        assert_eq!(quiz.question, "What pigment captures light?");
        assert_eq!(quiz.options.len(), 4);
        assert_eq!(quiz.correct_answer, "0");
        assert_eq!(quiz.options[0], "Chlorophyll");
    }

    #[test]
    fn test_parse_fenced_quiz_with_numeric_answer() {
        let reply = format!("```json\n{}\n```", VALID.replace("\"0\"", "2"));
        let quiz = QuizQuestion::parse(&reply).unwrap();
        assert_eq!(quiz.correct_answer, "2");
    }

    #[test]
    fn test_free_text_is_rejected() {
        let reply = "The correct answer is chlorophyll, which is correct because...";
        assert!(QuizQuestion::parse(reply).is_err());
    }

    #[test]
    fn test_wrong_option_count_is_rejected() {
        let reply = VALID.replace(", \"Hemoglobin\"", "");
        assert!(QuizQuestion::parse(&reply).is_err());
    }

    #[test]
    fn test_out_of_range_answer_is_rejected() {
        assert!(QuizQuestion::parse(&VALID.replace("\"0\"", "\"4\"")).is_err());
        assert!(QuizQuestion::parse(&VALID.replace("\"0\"", "\"B\"")).is_err());
    }
}
