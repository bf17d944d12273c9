pub mod prompt;
pub mod quiz;
pub mod tutor;

pub use quiz::QuizQuestion;
pub use tutor::{Tutor, TutorAction, TutorRequest, TutorRequestBody, TutorResponse};
