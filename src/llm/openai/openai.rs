use async_trait::async_trait;
use tracing::{debug, warn};

use crate::{
    errors::{PoducateError, Result},
    llm::{
        openai::structs::{
            api_error::ApiErrorResponse, chat_completion_request::ChatCompletionRequest,
            chat_completion_response::ChatCompletionResponse,
        },
        Prompt, TextGenerator,
    },
};

const SERVICE: &str = "text generation";

/// Client for an OpenAI compatible chat completions endpoint.
#[derive(Clone)]
pub struct OpenAI {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    pub model: String,
}

impl std::fmt::Debug for OpenAI {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAI")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl OpenAI {
    pub fn new(
        client: reqwest::Client,
        api_key: Option<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PoducateError::missing_credentials(SERVICE))
    }

    /// Send a chat completion request and return the decoded response.
    ///
    /// Non-success statuses become [`PoducateError::Upstream`] carrying the
    /// status code and the message from the error body when one is present.
    #[tracing::instrument(skip(request), fields(model = %request.model))]
    pub async fn chat(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(request)
            .send()
            .await
            .map_err(|err| PoducateError::upstream(SERVICE, None, err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
                Ok(parsed) => parsed.error.message,
                Err(_) if body.is_empty() => status.to_string(),
                Err(_) => body,
            };
            warn!(status = status.as_u16(), message = %message, "Chat completion rejected");
            return Err(PoducateError::upstream(SERVICE, Some(status.as_u16()), message));
        }

        let completion: ChatCompletionResponse = response.json().await?;
        debug!(choices = completion.choices.len(), "Chat completion received");
        Ok(completion)
    }
}

#[async_trait]
impl TextGenerator for OpenAI {
    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn complete(&self, prompt: &Prompt) -> Result<Option<String>> {
        let request = ChatCompletionRequest::from_prompt(&self.model, prompt);
        Ok(self.chat(&request).await?.into_content())
    }
}
