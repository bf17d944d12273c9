use std::{fmt, sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{error::Elapsed, timeout, timeout_at, Instant},
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    config::Config,
    errors::{constants::VOICE_LOOKUP_TIMEOUT_SECS, PoducateError, Result},
    generation::{prompt::build_script_prompt, request::GenerationRequest, script::shape_script},
    library::Episode,
    llm::{Prompt, TextGenerator},
    speech::{AudioStream, SpeechSynthesizer, VoiceInfo, VoiceSelection},
};

#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub voice: VoiceSelection,
    pub script_target_chars: usize,
    pub script_max_chars: usize,
    pub script_max_tokens: u32,
    pub timeout: Duration,
}

impl PipelineSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            voice: VoiceSelection {
                voice_id: config.voice_id.clone(),
                model_id: config.tts_model_id.clone(),
            },
            script_target_chars: config.script_target_chars,
            script_max_chars: config.script_max_chars,
            script_max_tokens: config.script_max_tokens,
            timeout: config.request_timeout(),
        }
    }
}

/// Where a generation currently is. Errors can exit from either waiting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    AwaitingScript,
    AwaitingAudio,
    Done,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AwaitingScript => "awaiting_script",
            Self::AwaitingAudio => "awaiting_audio",
            Self::Done => "done",
        })
    }
}

/// A generated script together with its audio, still being streamed.
pub struct PodcastResult {
    pub request_id: Uuid,
    pub title: String,
    pub script: String,
    pub voice: Option<VoiceInfo>,
    pub audio: AudioStream,
    /// Deadline the audio stream must finish by.
    pub deadline: Instant,
}

impl fmt::Debug for PodcastResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PodcastResult")
            .field("request_id", &self.request_id)
            .field("title", &self.title)
            .field("script_chars", &self.script.chars().count())
            .field("voice", &self.voice)
            .finish_non_exhaustive()
    }
}

/// Turns a [`GenerationRequest`] into a script and an audio stream.
#[derive(Clone)]
pub struct PodcastPipeline {
    writer: Arc<dyn TextGenerator>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    settings: PipelineSettings,
}

impl PodcastPipeline {
    pub fn new(
        writer: Arc<dyn TextGenerator>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            writer,
            synthesizer,
            settings,
        }
    }

    /// Voice metadata is incidental: the lookup runs on its own task with its
    /// own bound so it can never hold back the script or the audio.
    fn spawn_voice_lookup(&self) -> JoinHandle<std::result::Result<Result<VoiceInfo>, Elapsed>> {
        let synthesizer = self.synthesizer.clone();
        let voice_id = self.settings.voice.voice_id.clone();
        tokio::spawn(async move {
            timeout(
                Duration::from_secs(VOICE_LOOKUP_TIMEOUT_SECS),
                synthesizer.voice_info(&voice_id),
            )
            .await
        })
    }

    async fn collect_voice(
        lookup: JoinHandle<std::result::Result<Result<VoiceInfo>, Elapsed>>,
    ) -> Option<VoiceInfo> {
        match lookup.await {
            Ok(Ok(Ok(voice))) => Some(voice),
            Ok(Ok(Err(err))) => {
                warn!(error = %err, "Voice lookup failed, continuing without metadata");
                None
            }
            Ok(Err(_)) => {
                warn!("Voice lookup timed out, continuing without metadata");
                None
            }
            Err(err) => {
                warn!(error = %err, "Voice lookup task failed, continuing without metadata");
                None
            }
        }
    }

    async fn write_script(&self, deadline: Instant, prompt: &Prompt) -> Result<String> {
        let raw_script = match timeout_at(deadline, self.writer.complete(prompt)).await {
            Ok(result) => result.map_err(PoducateError::into_script_failure),
            Err(_) => Err(PoducateError::Timeout {
                stage: "generating the script",
            }),
        }
        .inspect_err(|err| warn!(error = %err, "Script generation failed"))?;

        raw_script
            .as_deref()
            .and_then(|raw| shape_script(raw, self.settings.script_max_chars))
            .ok_or_else(PoducateError::empty_script)
            .inspect_err(|_| warn!("Text generation returned an empty script"))
    }

    #[tracing::instrument(
        name = "generate",
        skip(self, request_id, request),
        fields(request_id = %request_id, topic = %request.topic, difficulty = request.difficulty)
    )]
    pub async fn generate_with_id(
        &self,
        request_id: Uuid,
        request: &GenerationRequest,
    ) -> Result<PodcastResult> {
        self.writer.ensure_configured()?;
        self.synthesizer.ensure_configured()?;

        let deadline = Instant::now() + self.settings.timeout;
        let prompt = build_script_prompt(
            request,
            self.settings.script_target_chars,
            self.settings.script_max_tokens,
        );

        info!(stage = %PipelineStage::AwaitingScript, "Generating script");

        let lookup = self.spawn_voice_lookup();

        let script = match self.write_script(deadline, &prompt).await {
            Ok(script) => script,
            Err(err) => {
                lookup.abort();
                return Err(err);
            }
        };

        let voice = Self::collect_voice(lookup).await;

        info!(
            stage = %PipelineStage::AwaitingAudio,
            chars = script.chars().count(),
            "Script ready, synthesizing audio"
        );

        let audio = match timeout_at(
            deadline,
            self.synthesizer.synthesize(&script, &self.settings.voice),
        )
        .await
        {
            Ok(Ok(audio)) => audio,
            Ok(Err(err)) => {
                let err = err.into_audio_failure(&script);
                warn!(error = %err, "Audio synthesis failed after script was produced");
                return Err(err);
            }
            Err(_) => {
                warn!("Audio synthesis timed out after script was produced");
                return Err(PoducateError::AudioSynthesis {
                    script,
                    status: Some(504),
                    message: "timed out waiting for the speech service".to_string(),
                });
            }
        };

        Ok(PodcastResult {
            request_id,
            title: Episode::generated_title(&request.topic),
            script,
            voice,
            audio,
            deadline,
        })
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<PodcastResult> {
        self.generate_with_id(Uuid::new_v4(), request).await
    }
}
