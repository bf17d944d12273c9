use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt};
use tracing::{info, warn};

use crate::{
    errors::{constants::AUDIO_MIME_TYPE, PoducateError, Result},
    speech::{
        elevenlabs::structs::{
            api_error::ApiErrorResponse, text_to_speech_request::TextToSpeechRequest, voice::Voice,
            voice_settings::VoiceSettings,
        },
        AudioStream, SpeechSynthesizer, VoiceInfo, VoiceSelection,
    },
};

const SERVICE: &str = "speech synthesis";
const API_KEY_HEADER: &str = "xi-api-key";
const OUTPUT_FORMAT: &str = "mp3_44100_128";

#[derive(Clone)]
pub struct ElevenLabs {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
}

impl std::fmt::Debug for ElevenLabs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElevenLabs")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ElevenLabs {
    pub fn new(client: reqwest::Client, api_key: Option<String>, base_url: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PoducateError::missing_credentials(SERVICE))
    }

    fn stream_url(&self, voice_id: &str) -> String {
        format!("{}/text-to-speech/{}/stream", self.base_url, voice_id)
    }

    async fn rejection(response: reqwest::Response) -> PoducateError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ApiErrorResponse>(&body) {
            Ok(parsed) => parsed.detail.message(),
            Err(_) if body.is_empty() => status.to_string(),
            Err(_) => body,
        };
        warn!(status = status.as_u16(), message = %message, "Speech service rejected request");
        PoducateError::upstream(SERVICE, Some(status.as_u16()), message)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabs {
    fn ensure_configured(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    #[tracing::instrument]
    async fn voice_info(&self, voice_id: &str) -> Result<VoiceInfo> {
        let response = self
            .client
            .get(format!("{}/voices/{}", self.base_url, voice_id))
            .header(API_KEY_HEADER, self.api_key()?)
            .send()
            .await
            .map_err(|err| PoducateError::upstream(SERVICE, None, err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        Ok(response.json::<Voice>().await?.into())
    }

    /// Open a streaming synthesis request.
    ///
    /// The returned future resolves once response headers arrive, so upstream
    /// status errors surface here rather than in the middle of the stream.
    #[tracing::instrument(skip(text), fields(chars = text.chars().count()))]
    async fn synthesize(&self, text: &str, voice: &VoiceSelection) -> Result<AudioStream> {
        let request = TextToSpeechRequest {
            text: text.to_string(),
            model_id: voice.model_id.clone(),
            voice_settings: Some(VoiceSettings::default()),
        };

        let response = self
            .client
            .post(self.stream_url(&voice.voice_id))
            .query(&[("output_format", OUTPUT_FORMAT)])
            .header(API_KEY_HEADER, self.api_key()?)
            .header(reqwest::header::ACCEPT, AUDIO_MIME_TYPE)
            .json(&request)
            .send()
            .await
            .map_err(|err| PoducateError::upstream(SERVICE, None, err.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::rejection(response).await);
        }

        info!("Speech stream opened");

        Ok(response
            .bytes_stream()
            .map_err(|err| PoducateError::upstream(SERVICE, None, err.to_string()))
            .boxed())
    }
}
