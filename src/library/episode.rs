use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{
    constants::{MAX_AUDIO_URL_LENGTH, MAX_SUBJECT_LENGTH, MAX_TOPIC_LENGTH, MAX_TRANSCRIPT_LENGTH},
    validation::validate_required_text,
    PoducateError, Result,
};

static DURATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}):([0-5]\d)$").expect("duration pattern is valid"));

/// An episode as shown in the dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Episode {
    pub id: u64,
    pub title: String,
    /// `mm:ss`, minutes may exceed 59.
    pub duration: String,
    pub subject: String,
    pub transcript: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl Episode {
    /// Title given to a freshly generated episode.
    pub fn generated_title(topic: &str) -> String {
        format!("Generated Podcast: {}", topic)
    }

    /// Check an episode submitted by a client.
    pub fn validate(&self) -> Result<()> {
        validate_required_text("title", Some(&self.title), MAX_TOPIC_LENGTH + 32)?;
        validate_required_text("subject", Some(&self.subject), MAX_SUBJECT_LENGTH)?;
        parse_duration(&self.duration)?;

        if self.transcript.chars().count() > MAX_TRANSCRIPT_LENGTH {
            return Err(PoducateError::invalid_input(format!(
                "Field `transcript` is too long (max {} characters)",
                MAX_TRANSCRIPT_LENGTH
            )));
        }
        if self
            .audio_url
            .as_ref()
            .is_some_and(|url| url.len() > MAX_AUDIO_URL_LENGTH)
        {
            return Err(PoducateError::invalid_input(format!(
                "Field `audioUrl` is too long (max {} bytes)",
                MAX_AUDIO_URL_LENGTH
            )));
        }
        Ok(())
    }
}

pub fn parse_duration(duration: &str) -> Result<u64> {
    let captures = DURATION
        .captures(duration)
        .ok_or_else(|| PoducateError::invalid_input(format!("Invalid duration {:?}, expected mm:ss", duration)))?;

    let minutes: u64 = captures[1].parse().unwrap_or_default();
    let seconds: u64 = captures[2].parse().unwrap_or_default();
    Ok(minutes * 60 + seconds)
}
