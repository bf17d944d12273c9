use serde::{Deserialize, Serialize};

use super::chat_message::ChatMessage;

#[derive(Serialize, Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct Choice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

impl ChatCompletionResponse {
    /// Content of the first choice, `None` when missing or blank.
    pub fn into_content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
    }
}
