pub mod api_error;
pub mod text_to_speech_request;
pub mod voice;
pub mod voice_settings;
