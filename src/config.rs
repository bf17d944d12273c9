use std::{env, path::Path, time::Duration};

use serde::Deserialize;
use tracing::{info, warn};

use crate::errors::{constants::*, PoducateError, Result};

#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    pub openai_api_key: Option<String>,
    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,
    #[serde(default = "default_openai_model")]
    pub openai_model: String,
    pub elevenlabs_api_key: Option<String>,
    #[serde(default = "default_elevenlabs_base_url")]
    pub elevenlabs_base_url: String,
    #[serde(default = "default_voice_id")]
    pub voice_id: String,
    #[serde(default = "default_tts_model_id")]
    pub tts_model_id: String,
    pub redis_url: Option<String>,
    pub otel_http_url: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_script_target_chars")]
    pub script_target_chars: usize,
    #[serde(default = "default_script_max_chars")]
    pub script_max_chars: usize,
    #[serde(default = "default_script_max_tokens")]
    pub script_max_tokens: u32,
    #[serde(default = "default_tutor_max_tokens")]
    pub tutor_max_tokens: u32,
    #[serde(default = "default_session_capacity")]
    pub session_capacity: usize,
}

fn default_bind_addr() -> String {
    DEFAULT_BIND_ADDR.to_string()
}

fn default_openai_base_url() -> String {
    DEFAULT_OPENAI_BASE_URL.to_string()
}

fn default_openai_model() -> String {
    DEFAULT_OPENAI_MODEL.to_string()
}

fn default_elevenlabs_base_url() -> String {
    DEFAULT_ELEVENLABS_BASE_URL.to_string()
}

fn default_voice_id() -> String {
    DEFAULT_VOICE_ID.to_string()
}

fn default_tts_model_id() -> String {
    DEFAULT_TTS_MODEL_ID.to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_script_target_chars() -> usize {
    DEFAULT_SCRIPT_TARGET_CHARS
}

fn default_script_max_chars() -> usize {
    DEFAULT_SCRIPT_MAX_CHARS
}

fn default_script_max_tokens() -> u32 {
    DEFAULT_SCRIPT_MAX_TOKENS
}

fn default_tutor_max_tokens() -> u32 {
    DEFAULT_TUTOR_MAX_TOKENS
}

fn default_session_capacity() -> usize {
    DEFAULT_SESSION_CAPACITY
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            openai_model: default_openai_model(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: default_elevenlabs_base_url(),
            voice_id: default_voice_id(),
            tts_model_id: default_tts_model_id(),
            redis_url: None,
            otel_http_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            script_target_chars: default_script_target_chars(),
            script_max_chars: default_script_max_chars(),
            script_max_tokens: default_script_max_tokens(),
            tutor_max_tokens: default_tutor_max_tokens(),
            session_capacity: default_session_capacity(),
        }
    }
}

impl Config {
    /// Load the config file, falling back to `PODUCATE_*` environment variables
    /// when the file does not exist.
    pub fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let path = Path::new(&path);

        let config = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::from_env()?
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str::<Config>(&content)?)
    }

    pub fn from_env() -> Result<Self> {
        let mut config = Config {
            openai_api_key: env_var("OPENAI_API_KEY"),
            elevenlabs_api_key: env_var("ELEVEN_LABS_API_KEY"),
            redis_url: env_var("REDIS_URL"),
            otel_http_url: env_var("OTEL_HTTP_URL"),
            ..Config::default()
        };

        if let Some(bind_addr) = env_var("BIND_ADDR") {
            config.bind_addr = bind_addr;
        }
        if let Some(url) = env_var("OPENAI_BASE_URL") {
            config.openai_base_url = url;
        }
        if let Some(model) = env_var("OPENAI_MODEL") {
            config.openai_model = model;
        }
        if let Some(url) = env_var("ELEVENLABS_BASE_URL") {
            config.elevenlabs_base_url = url;
        }
        if let Some(voice_id) = env_var("VOICE_ID") {
            config.voice_id = voice_id;
        }
        if let Some(model_id) = env_var("TTS_MODEL_ID") {
            config.tts_model_id = model_id;
        }
        if let Some(secs) = env_var("REQUEST_TIMEOUT_SECS") {
            config.request_timeout_secs = parse_number("REQUEST_TIMEOUT_SECS", &secs)?;
        }
        if let Some(capacity) = env_var("SESSION_CAPACITY") {
            config.session_capacity = parse_number("SESSION_CAPACITY", &capacity)?;
        }

        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.request_timeout_secs == 0 {
            return Err(PoducateError::config("request_timeout_secs must be greater than 0"));
        }
        if self.session_capacity == 0 {
            return Err(PoducateError::config("session_capacity must be greater than 0"));
        }
        if self.script_target_chars == 0 || self.script_max_chars == 0 {
            return Err(PoducateError::config(
                "script_target_chars and script_max_chars must be greater than 0",
            ));
        }
        if self.script_max_chars < self.script_target_chars {
            return Err(PoducateError::config(
                "script_max_chars must not be smaller than script_target_chars",
            ));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Log which credentials are present without revealing them.
    pub fn log_credentials(&self) {
        for (name, key) in [
            ("OPENAI_API_KEY", &self.openai_api_key),
            ("ELEVEN_LABS_API_KEY", &self.elevenlabs_api_key),
        ] {
            if key.as_deref().is_some_and(|k| !k.is_empty()) {
                info!(credential = name, "Credential set");
            } else {
                warn!(credential = name, "Credential not set");
            }
        }
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(format!("{}{}", ENV_PREFIX, name))
        .ok()
        .filter(|value| !value.is_empty())
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| {
        PoducateError::config(format!("{}{} must be a number, got {:?}", ENV_PREFIX, name, value))
    })
}
