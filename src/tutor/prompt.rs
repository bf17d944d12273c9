use crate::{
    errors::constants::{MAX_TRANSCRIPT_EXCERPT_CHARS, TUTOR_NAME},
    llm::Prompt,
    tutor::tutor::{TutorAction, TutorRequest},
};

/// Keep the first `max_chars` characters of a transcript, marking the cut.
pub fn excerpt(transcript: &str, max_chars: usize) -> String {
    match transcript.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &transcript[..cut]),
        None => transcript.to_string(),
    }
}

fn system_prompt(action: TutorAction, podcast_title: &str) -> String {
    match action {
        TutorAction::Explain => format!(
            "You are an AI assistant named {TUTOR_NAME}, specialized in explaining podcasts. \
             Use the provided transcript summary to give detailed explanations about the podcast \
             content. The podcast title is \"{podcast_title}\". Be informative, clear, and \
             engaging in your responses."
        ),
        TutorAction::Quiz => format!(
            "You are an AI assistant named {TUTOR_NAME}, specialized in creating quizzes about \
             podcasts. Use the provided transcript summary to write one multiple-choice question \
             that tests understanding of a key concept discussed in the podcast. The podcast \
             title is \"{podcast_title}\". Respond with a single JSON object and nothing else, \
             using exactly this structure:\n\
             {{\"question\": \"The question text\", \
             \"options\": [\"Option 1\", \"Option 2\", \"Option 3\", \"Option 4\"], \
             \"correctAnswer\": \"The index of the correct option as a string: 0, 1, 2 or 3\", \
             \"explanation\": \"Why the correct option is right\"}}\n\
             Do not ask the user to type A, B, C, or D. The user will click buttons to answer."
        ),
    }
}

pub fn build_tutor_prompt(request: &TutorRequest, max_tokens: u32) -> Prompt {
    Prompt {
        system: system_prompt(request.action, &request.podcast_title),
        user: format!(
            "Transcript summary: {}\n\nUser message: {}",
            excerpt(&request.transcript, MAX_TRANSCRIPT_EXCERPT_CHARS),
            request.message
        ),
        max_tokens,
    }
}
