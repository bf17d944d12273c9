pub mod pipeline;
pub mod prompt;
pub mod request;
pub mod script;
pub mod stream;

pub use pipeline::{PipelineSettings, PipelineStage, PodcastPipeline, PodcastResult};
pub use request::{GenerationRequest, GenerationRequestBody};
