use serde::{Deserialize, Serialize};

use super::voice_settings::VoiceSettings;

/// Example:
/// ```ignore
/// TextToSpeechRequest {
///     text: String::from("Welcome to today's episode."),
///     model_id: String::from("eleven_turbo_v2"),
///     voice_settings: Some(VoiceSettings::default()),
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TextToSpeechRequest {
    pub text: String,
    pub model_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_settings: Option<VoiceSettings>,
}
