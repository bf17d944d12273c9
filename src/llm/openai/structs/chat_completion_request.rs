use serde::{Deserialize, Serialize};

use super::chat_message::ChatMessage;
use crate::llm::Prompt;

/// Example:
/// ```ignore
/// ChatCompletionRequest {
///     model: String::from("gpt-3.5-turbo"),
///     messages: vec![
///         ChatMessage::system("You are an expert podcast script writer"),
///         ChatMessage::user("Create a podcast script about tides"),
///     ],
///     max_tokens: 1250,
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    pub fn from_prompt(model: &str, prompt: &Prompt) -> Self {
        Self {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(prompt.system.clone()),
                ChatMessage::user(prompt.user.clone()),
            ],
            max_tokens: prompt.max_tokens,
        }
    }
}
