use serde::{Deserialize, Serialize};

use crate::speech::VoiceInfo;

#[derive(Serialize, Deserialize, Debug)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    pub category: Option<String>,
}

impl From<Voice> for VoiceInfo {
    fn from(voice: Voice) -> Self {
        Self {
            voice_id: voice.voice_id,
            name: voice.name,
            category: voice.category,
        }
    }
}
