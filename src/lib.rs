// Public API for the Poducate library

pub mod config;
pub mod database;
pub mod errors;
pub mod generation;
pub mod library;
pub mod llm;
pub mod server;
pub mod speech;
pub mod trace;
pub mod tutor;

// Re-export commonly used types
pub use config::Config;
pub use errors::{PoducateError, Result};
pub use generation::{GenerationRequest, PodcastPipeline};
pub use server::{router, AppState};
pub use tutor::Tutor;
