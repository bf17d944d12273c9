use once_cell::sync::Lazy;
use regex::Regex;

/// `Host:` / `NARRATOR:` style prefixes at the start of a line.
static SPEAKER_LABEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?im)^[ \t]*(?:\*\*)?(?:host|narrator|speaker(?: \d+)?|announcer)(?:\*\*)?[ \t]*:[ \t]*")
        .expect("speaker label pattern is valid")
});

/// Bracketed production notes such as `[Intro music]` or `(SFX: bell)`.
static AUDIO_CUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\[[^\]\n]*\]|\((?:music|sfx|sound|pause|intro|outro)[^)\n]*\)")
        .expect("audio cue pattern is valid")
});

static BLANK_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n[ \t]*(?:\n[ \t]*)+").expect("blank run pattern is valid"));

/// Clean a generated script for narration and bound its length.
///
/// Returns `None` when nothing speakable is left.
pub fn shape_script(raw: &str, max_chars: usize) -> Option<String> {
    let text = SPEAKER_LABEL.replace_all(raw, "");
    let text = AUDIO_CUE.replace_all(&text, "");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    let text = text.trim();

    if text.is_empty() {
        return None;
    }

    let shaped = truncate_at_sentence(text, max_chars);
    (!shaped.is_empty()).then_some(shaped)
}

/// Cut `text` to at most `max_chars` characters, preferring the last sentence
/// end inside the limit.
pub fn truncate_at_sentence(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((index, _)) => index,
        None => return text.to_string(),
    };

    let head = &text[..cut];
    match head.rfind(&['.', '!', '?'][..]) {
        Some(end) if end > 0 => head[..=end].to_string(),
        _ => head.trim_end().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_labels_and_cues() {
        let raw = "[Intro music]\nHost: Welcome to the show.\n\n\n\n(SFX: bell) Today we talk about leaves.";
        assert_eq!(
            shape_script(raw, 1000).unwrap(),
            "Welcome to the show.\n\nToday we talk about leaves."
        );
    }

    #[test]
    fn test_keeps_ordinary_parentheses() {
        let raw = "Plants (mostly) make sugar.";
        assert_eq!(shape_script(raw, 1000).unwrap(), raw);
    }

    #[test]
    fn test_nothing_speakable() {
        assert_eq!(shape_script("  [music]  \n Host: ", 1000), None);
        assert_eq!(shape_script("", 1000), None);
        assert_eq!(shape_script("Hello.", 0), None);
    }

    #[test]
    fn test_truncate_prefers_sentence_end() {
        let text = "One. Two two. Three three three";
        assert_eq!(truncate_at_sentence(text, 20), "One. Two two.");
        assert_eq!(truncate_at_sentence(text, 100), text);
    }

    #[test]
    fn test_truncate_without_sentence_end() {
        assert_eq!(truncate_at_sentence("abcdef ghij", 8), "abcdef g");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let text = "éééé. ééé";
        assert_eq!(truncate_at_sentence(text, 7), "éééé.");
    }
}
