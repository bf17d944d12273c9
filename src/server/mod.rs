pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate-podcast", post(handlers::generate_podcast))
        .route("/api/generate-podcast", post(handlers::generate_podcast))
        .route("/podugenius", post(handlers::podugenius))
        .route("/api/podugenius", post(handlers::podugenius))
        .route("/episodes", get(handlers::list_episodes))
        .route("/subjects", get(handlers::subjects))
        .route(
            "/sessions/{session}/bookmarks",
            get(handlers::list_bookmarks).post(handlers::add_bookmark),
        )
        .route(
            "/sessions/{session}/bookmarks/{id}",
            delete(handlers::remove_bookmark),
        )
        .route(
            "/sessions/{session}/recent",
            get(handlers::list_recent).post(handlers::record_play),
        )
        .route("/test-db", get(handlers::test_db))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
