use crate::{generation::request::GenerationRequest, llm::Prompt};

/// Build the script prompt for a validated request.
///
/// The system instruction fixes a single narrator, a conversational teaching
/// tone and the target length; the user message carries the request itself.
pub fn build_script_prompt(request: &GenerationRequest, target_chars: usize, max_tokens: u32) -> Prompt {
    let system = format!(
        "You are an expert educational podcast script writer. You write scripts for a single \
         host speaking directly to the listener in a warm, clear and engaging tone. Scripts are \
         about {} characters in length and are meant to be read aloud as-is.",
        target_chars
    );

    let mut user = format!(
        "Create a podcast script about {} in the style of {} at difficulty level {}/10. Subject: {}.",
        request.topic, request.style, request.difficulty, request.subject
    );

    if let Some(context) = &request.context {
        user.push_str(&format!(" Additional context from the listener: {}.", context));
    }

    user.push_str(" Write it without any interruptions, speaker labels, or audio cues.");

    Prompt {
        system,
        user,
        max_tokens,
    }
}
