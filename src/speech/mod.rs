pub mod elevenlabs;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Audio bytes as they arrive from the synthesis service.
pub type AudioStream = BoxStream<'static, Result<Bytes>>;

/// The fixed voice identity used for narration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceSelection {
    pub voice_id: String,
    pub model_id: String,
}

/// Display metadata for a voice.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoiceInfo {
    pub voice_id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Speech-synthesis collaborator.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Fails with a configuration error when no credentials are available.
    fn ensure_configured(&self) -> Result<()>;

    /// Look up display metadata for a voice.
    async fn voice_info(&self, voice_id: &str) -> Result<VoiceInfo>;

    /// Start synthesizing `text`. Resolves once the service has accepted the
    /// request; the audio itself arrives through the returned stream.
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<AudioStream>;
}
