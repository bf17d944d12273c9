use serde::{Deserialize, Serialize};

/// Example:
/// ```ignore
/// VoiceSettings {
///     stability: 0.5,
///     similarity_boost: 0.75,
/// }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
        }
    }
}
