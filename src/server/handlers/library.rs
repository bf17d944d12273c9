use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};

use crate::{
    errors::{validation::validate_session_id, Result},
    library::{
        catalog::{filter_episodes, generator_options, sample_episodes, EpisodeFilter, GeneratorOptions},
        Episode,
    },
    server::state::AppState,
};

/// `GET /episodes?subject=&q=`
pub async fn list_episodes(Query(filter): Query<EpisodeFilter>) -> Json<Vec<Episode>> {
    Json(filter_episodes(sample_episodes(), &filter))
}

/// `GET /subjects`
pub async fn subjects() -> Json<GeneratorOptions> {
    Json(generator_options())
}

pub async fn list_bookmarks(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<Vec<Episode>>> {
    validate_session_id(&session)?;
    Ok(Json(state.sessions.bookmarks(&session).await))
}

pub async fn add_bookmark(
    State(state): State<AppState>,
    Path(session): Path<String>,
    payload: std::result::Result<Json<Episode>, JsonRejection>,
) -> Result<Json<Vec<Episode>>> {
    validate_session_id(&session)?;
    let Json(episode) = payload?;
    episode.validate()?;

    Ok(Json(state.sessions.add_bookmark(&session, episode).await?))
}

pub async fn remove_bookmark(
    State(state): State<AppState>,
    Path((session, id)): Path<(String, u64)>,
) -> Result<Json<Vec<Episode>>> {
    validate_session_id(&session)?;
    Ok(Json(state.sessions.remove_bookmark(&session, id).await))
}

pub async fn list_recent(
    State(state): State<AppState>,
    Path(session): Path<String>,
) -> Result<Json<Vec<Episode>>> {
    validate_session_id(&session)?;
    Ok(Json(state.sessions.recent(&session).await))
}

pub async fn record_play(
    State(state): State<AppState>,
    Path(session): Path<String>,
    payload: std::result::Result<Json<Episode>, JsonRejection>,
) -> Result<Json<Vec<Episode>>> {
    validate_session_id(&session)?;
    let Json(episode) = payload?;
    episode.validate()?;

    Ok(Json(state.sessions.record_play(&session, episode).await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{errors::PoducateError, server::handlers::tests::idle_state};

    fn catalog_episode(id: u64) -> Episode {
        sample_episodes()[(id - 1) as usize].clone()
    }

    fn ids(episodes: &[Episode]) -> Vec<u64> {
        episodes.iter().map(|e| e.id).collect()
    }

    #[tokio::test]
    async fn test_list_episodes_filters() {
        let filter = EpisodeFilter {
            subject: Some("Technology".into()),
            q: Some("FUTURE".into()),
        };
        let Json(episodes) = list_episodes(Query(filter)).await;
        assert_eq!(ids(&episodes), vec![1]);
    }

    #[tokio::test]
    async fn test_subjects_lists_styles() {
        let Json(options) = subjects().await;
        assert_eq!(options.subjects.len(), 6);
        assert!(options.styles.contains(&"Deep Dives"));
    }

    #[tokio::test]
    async fn test_bookmark_round_trip() {
        let state = idle_state();
        let session = || Path("listener-1".to_string());

        add_bookmark(State(state.clone()), session(), Ok(Json(catalog_episode(3))))
            .await
            .unwrap();
        let Json(bookmarks) =
            add_bookmark(State(state.clone()), session(), Ok(Json(catalog_episode(3))))
                .await
                .unwrap();
        assert_eq!(ids(&bookmarks), vec![3]);

        let Json(bookmarks) = remove_bookmark(
            State(state.clone()),
            Path(("listener-1".to_string(), 3)),
        )
        .await
        .unwrap();
        assert!(bookmarks.is_empty());
    }

    #[tokio::test]
    async fn test_recent_plays() {
        let state = idle_state();
        for id in [1, 2, 3] {
            record_play(
                State(state.clone()),
                Path("s".to_string()),
                Ok(Json(catalog_episode(id))),
            )
            .await
            .unwrap();
        }

        let Json(recent) = list_recent(State(state), Path("s".to_string()))
            .await
            .unwrap();
        assert_eq!(ids(&recent), vec![3, 2]);
    }

    #[tokio::test]
    async fn test_invalid_session_id() {
        let err = list_bookmarks(State(idle_state()), Path("../etc".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, PoducateError::InvalidInput(_)));
    }
}
