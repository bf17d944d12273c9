use std::{sync::Arc, time::Duration};

use crate::{
    database::Datastore, generation::PodcastPipeline, library::SessionStore, tutor::Tutor,
};

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<PodcastPipeline>,
    pub tutor: Arc<Tutor>,
    pub sessions: Arc<SessionStore>,
    pub datastore: Option<Arc<dyn Datastore>>,
    /// Upper bound for requests that do not stream.
    pub timeout: Duration,
}
