/// Custom error types for the Poducate service
#[derive(Debug, thiserror::Error)]
pub enum PoducateError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Script generation failed: {message}")]
    ScriptGeneration {
        status: Option<u16>,
        message: String,
    },

    #[error("Audio synthesis failed: {message}")]
    AudioSynthesis {
        script: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{service} service returned an error: {message}")]
    Upstream {
        service: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("Tutor request failed: {message}")]
    Tutor {
        status: Option<u16>,
        message: String,
    },

    #[error("Timed out while {stage}")]
    Timeout { stage: &'static str },

    #[error("Datastore error: {0}")]
    Database(String),

    #[error("Datastore is not configured")]
    DatabaseNotConfigured,

    #[error("Redis error: {0}")]
    Redis(#[from] bb8_redis::redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl PoducateError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn script_generation(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::ScriptGeneration {
            status,
            message: message.into(),
        }
    }

    pub fn empty_script() -> Self {
        Self::script_generation(None, "the text generation service returned no script")
    }

    pub fn tutor(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Tutor {
            status,
            message: message.into(),
        }
    }

    pub fn upstream(service: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service,
            status,
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database(message.into())
    }

    pub fn missing_credentials(service: &str) -> Self {
        Self::Config(format!("API key for the {} service is not set", service))
    }

    /// Re-tag a collaborator failure as a script generation failure.
    pub fn into_script_failure(self) -> Self {
        match self {
            Self::ScriptGeneration { .. } | Self::Config(_) | Self::Timeout { .. } => self,
            other => Self::ScriptGeneration {
                status: other.upstream_status(),
                message: other.upstream_message(),
            },
        }
    }

    /// Re-tag a collaborator failure as a tutor failure.
    pub fn into_tutor_failure(self) -> Self {
        match self {
            Self::Tutor { .. } | Self::Config(_) | Self::InvalidInput(_) | Self::Timeout { .. } => {
                self
            }
            other => Self::Tutor {
                status: other.upstream_status(),
                message: other.upstream_message(),
            },
        }
    }

    /// Attach the script that was produced before synthesis failed.
    ///
    /// Errors that already carry a script are returned untouched, anything
    /// else becomes an [`PoducateError::AudioSynthesis`] keyed to `script`.
    pub fn into_audio_failure(self, script: &str) -> Self {
        match self {
            Self::AudioSynthesis { .. } | Self::Config(_) => self,
            other => Self::AudioSynthesis {
                script: script.to_string(),
                status: other.upstream_status(),
                message: other.upstream_message(),
            },
        }
    }

    fn upstream_message(&self) -> String {
        match self {
            Self::Upstream { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Status code reported by an upstream collaborator, if any.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::ScriptGeneration { status, .. }
            | Self::AudioSynthesis { status, .. }
            | Self::Upstream { status, .. }
            | Self::Tutor { status, .. } => *status,
            Self::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Script produced before the failure, surfaced as a partial result.
    pub fn partial_script(&self) -> Option<&str> {
        match self {
            Self::AudioSynthesis { script, .. } => Some(script),
            _ => None,
        }
    }

    /// Machine readable error code used in JSON error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "configuration_error",
            Self::InvalidInput(_) => "validation_error",
            Self::ScriptGeneration { .. } => "script_generation_failed",
            Self::AudioSynthesis { .. } => "audio_synthesis_failed",
            Self::Upstream { .. } => "upstream_error",
            Self::Tutor { .. } => "tutor_failed",
            Self::Timeout { .. } => "timeout",
            Self::Database(_) | Self::Redis(_) | Self::DatabaseNotConfigured => "datastore_error",
            _ => "unknown_error",
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, PoducateError>;

/// Input validation functions
pub mod validation {
    use super::*;

    /// Validate a required free text field and return it trimmed
    pub fn validate_required_text(field: &str, value: Option<&str>, max_length: usize) -> Result<String> {
        let value = value.map(str::trim).unwrap_or_default();

        if value.is_empty() {
            return Err(PoducateError::invalid_input(format!(
                "Field `{}` is required",
                field
            )));
        }

        if value.chars().count() > max_length {
            return Err(PoducateError::invalid_input(format!(
                "Field `{}` is too long (max {} characters)",
                field, max_length
            )));
        }

        Ok(value.to_string())
    }

    /// Validate optional free text, treating blank input as absent
    pub fn validate_optional_text(
        field: &str,
        value: Option<&str>,
        max_length: usize,
    ) -> Result<Option<String>> {
        match value.map(str::trim) {
            None | Some("") => Ok(None),
            Some(value) => validate_required_text(field, Some(value), max_length).map(Some),
        }
    }

    /// Validate the difficulty slider value
    pub fn validate_difficulty(value: Option<i64>) -> Result<u8> {
        let value = value.ok_or_else(|| PoducateError::invalid_input("Field `difficulty` is required"))?;

        if !(constants::MIN_DIFFICULTY..=constants::MAX_DIFFICULTY).contains(&value) {
            return Err(PoducateError::invalid_input(format!(
                "Field `difficulty` must be between {} and {}",
                constants::MIN_DIFFICULTY,
                constants::MAX_DIFFICULTY
            )));
        }

        Ok(value as u8)
    }

    /// Validate a client supplied session identifier
    pub fn validate_session_id(session: &str) -> Result<()> {
        if session.is_empty() || session.len() > constants::MAX_SESSION_ID_LENGTH {
            return Err(PoducateError::invalid_input(format!(
                "Session id must be 1 to {} characters",
                constants::MAX_SESSION_ID_LENGTH
            )));
        }

        if !session
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-".contains(c))
        {
            return Err(PoducateError::invalid_input(
                "Session id contains invalid characters (only ASCII alphanumeric, hyphens, and underscores allowed)",
            ));
        }

        Ok(())
    }
}

/// Constants used throughout the application
pub mod constants {
    // Configuration constants
    pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
    pub const CONFIG_PATH_ENV: &str = "PODUCATE_CONFIG";
    pub const ENV_PREFIX: &str = "PODUCATE_";
    pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
    pub const SERVICE_NAME: &str = "poducate";

    // Collaborator defaults
    pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
    pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";
    pub const DEFAULT_ELEVENLABS_BASE_URL: &str = "https://api.elevenlabs.io/v1";
    pub const DEFAULT_VOICE_ID: &str = "sPzOOqSRgtzdT8DPbJYh";
    pub const DEFAULT_TTS_MODEL_ID: &str = "eleven_turbo_v2";
    pub const AUDIO_MIME_TYPE: &str = "audio/mpeg";

    // Generation constants
    pub const MIN_DIFFICULTY: i64 = 1;
    pub const MAX_DIFFICULTY: i64 = 10;
    pub const MAX_TOPIC_LENGTH: usize = 200;
    pub const MAX_SUBJECT_LENGTH: usize = 100;
    pub const MAX_STYLE_LENGTH: usize = 100;
    pub const MAX_CONTEXT_LENGTH: usize = 2000;
    pub const DEFAULT_SCRIPT_TARGET_CHARS: usize = 5000;
    pub const DEFAULT_SCRIPT_MAX_CHARS: usize = 6000;
    pub const DEFAULT_SCRIPT_MAX_TOKENS: u32 = 1250;
    pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
    pub const VOICE_LOOKUP_TIMEOUT_SECS: u64 = 2;

    // Tutor constants
    pub const TUTOR_NAME: &str = "Podugenius";
    pub const MAX_TRANSCRIPT_EXCERPT_CHARS: usize = 1000;
    pub const MAX_TUTOR_MESSAGE_LENGTH: usize = 2000;
    pub const DEFAULT_TUTOR_MAX_TOKENS: u32 = 500;
    pub const QUIZ_OPTION_COUNT: usize = 4;

    // Library constants
    pub const DEFAULT_SESSION_CAPACITY: usize = 1000;
    pub const RECENTLY_LISTENED_CAPACITY: usize = 2;
    pub const MAX_BOOKMARKS_PER_SESSION: usize = 100;
    pub const MAX_TRANSCRIPT_LENGTH: usize = 20_000;
    pub const MAX_AUDIO_URL_LENGTH: usize = 2048;
    pub const MAX_SESSION_ID_LENGTH: usize = 64;

    // Datastore constants
    pub const REDIS_CONNECTION_TIMEOUT_SECS: u64 = 5;
    pub const REDIS_MAX_CONNECTIONS: u32 = 4;

    // Messages
    pub const UPSTREAM_AUTH_MESSAGE: &str =
        "Authentication with an upstream service failed. Check the configured API keys.";
    pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";
}
