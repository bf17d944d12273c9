pub mod openai;

use async_trait::async_trait;

use crate::errors::Result;

/// A single completion request: system instruction, user message and token budget.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

/// Text-completion collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Fails with a configuration error when no credentials are available.
    /// Called before any outbound request is made.
    fn ensure_configured(&self) -> Result<()>;

    /// Run one completion. `None` means the service answered without content.
    async fn complete(&self, prompt: &Prompt) -> Result<Option<String>>;
}
