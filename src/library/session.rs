use std::num::NonZeroUsize;

use lru::LruCache;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{
    errors::{
        constants::{MAX_BOOKMARKS_PER_SESSION, RECENTLY_LISTENED_CAPACITY},
        PoducateError, Result,
    },
    library::episode::Episode,
};

/// Episodes saved by a listener, in the order they were added.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct Bookmarks(Vec<Episode>);

impl Bookmarks {
    /// Returns `false` if an episode with the same id is already saved.
    pub fn add(&mut self, episode: Episode) -> Result<bool> {
        if self.contains(episode.id) {
            return Ok(false);
        }
        if self.0.len() >= MAX_BOOKMARKS_PER_SESSION {
            return Err(PoducateError::invalid_input(format!(
                "Bookmark limit reached ({} episodes)",
                MAX_BOOKMARKS_PER_SESSION
            )));
        }
        self.0.push(episode);
        Ok(true)
    }

    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.0.len();
        self.0.retain(|episode| episode.id != id);
        before != self.0.len()
    }

    pub fn contains(&self, id: u64) -> bool {
        self.0.iter().any(|episode| episode.id == id)
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.0
    }
}

/// The last few episodes played, most recent first.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct RecentlyListened(Vec<Episode>);

impl RecentlyListened {
    pub fn record(&mut self, episode: Episode) {
        self.0.retain(|played| played.id != episode.id);
        self.0.insert(0, episode);
        self.0.truncate(RECENTLY_LISTENED_CAPACITY);
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.0
    }
}

#[derive(Serialize, Debug, Clone, Default)]
pub struct SessionLibrary {
    pub bookmarks: Bookmarks,
    pub recent: RecentlyListened,
}

/// Per-session libraries, evicting the least recently used session when full.
pub struct SessionStore {
    sessions: Mutex<LruCache<String, SessionLibrary>>,
}

impl SessionStore {
    pub fn new(capacity: usize) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| PoducateError::config("session_capacity must be greater than 0"))?;

        Ok(Self {
            sessions: Mutex::new(LruCache::new(capacity)),
        })
    }

    /// Run `f` against the session's library, creating it on first use.
    pub async fn with_library<T>(&self, session: &str, f: impl FnOnce(&mut SessionLibrary) -> T) -> T {
        let mut sessions = self.sessions.lock().await;
        if !sessions.contains(session) {
            debug!(session, sessions = sessions.len(), "Creating session library");
        }
        let library = sessions.get_or_insert_mut(session.to_string(), SessionLibrary::default);
        f(library)
    }

    /// Run `f` against an existing library. Unknown sessions stay unknown.
    async fn read_library<T>(&self, session: &str, f: impl FnOnce(&SessionLibrary) -> T) -> Option<T> {
        self.sessions.lock().await.get(session).map(f)
    }

    pub async fn bookmarks(&self, session: &str) -> Vec<Episode> {
        self.read_library(session, |library| library.bookmarks.episodes().to_vec())
            .await
            .unwrap_or_default()
    }

    pub async fn add_bookmark(&self, session: &str, episode: Episode) -> Result<Vec<Episode>> {
        self.with_library(session, |library| {
            library.bookmarks.add(episode)?;
            Ok(library.bookmarks.episodes().to_vec())
        })
        .await
    }

    /// Removing an episode that is not bookmarked is a no-op.
    pub async fn remove_bookmark(&self, session: &str, id: u64) -> Vec<Episode> {
        let mut sessions = self.sessions.lock().await;
        match sessions.get_mut(session) {
            Some(library) => {
                if !library.bookmarks.remove(id) {
                    debug!(session, id, "Episode was not bookmarked");
                }
                library.bookmarks.episodes().to_vec()
            }
            None => Vec::new(),
        }
    }

    pub async fn recent(&self, session: &str) -> Vec<Episode> {
        self.read_library(session, |library| library.recent.episodes().to_vec())
            .await
            .unwrap_or_default()
    }

    pub async fn record_play(&self, session: &str, episode: Episode) -> Vec<Episode> {
        self.with_library(session, |library| {
            library.recent.record(episode);
            library.recent.episodes().to_vec()
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(id: u64) -> Episode {
        Episode {
            id,
            title: format!("Episode {id}"),
            duration: "10:00".into(),
            subject: "Science".into(),
            transcript: String::new(),
            audio_url: None,
        }
    }

    fn ids(episodes: &[Episode]) -> Vec<u64> {
        episodes.iter().map(|e| e.id).collect()
    }

    #[test]
    fn test_bookmarks_dedupe_by_id() {
        let mut bookmarks = Bookmarks::default();
        assert!(bookmarks.add(episode(1)).unwrap());
        assert!(bookmarks.add(episode(2)).unwrap());
        assert!(!bookmarks.add(episode(1)).unwrap());
        assert_eq!(ids(bookmarks.episodes()), vec![1, 2]);

        assert!(bookmarks.remove(1));
        assert!(!bookmarks.remove(1));
        assert_eq!(ids(bookmarks.episodes()), vec![2]);
    }

    #[test]
    fn test_recent_keeps_two_most_recent_first() {
        let mut recent = RecentlyListened::default();
        recent.record(episode(1));
        recent.record(episode(2));
        recent.record(episode(3));
        assert_eq!(ids(recent.episodes()), vec![3, 2]);

        recent.record(episode(2));
        assert_eq!(ids(recent.episodes()), vec![2, 3]);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new(10).unwrap();
        store.add_bookmark("alice", episode(1)).await.unwrap();
        store.add_bookmark("bob", episode(2)).await.unwrap();

        assert_eq!(ids(&store.bookmarks("alice").await), vec![1]);
        assert_eq!(ids(&store.bookmarks("bob").await), vec![2]);
        assert_eq!(ids(&store.remove_bookmark("alice", 2).await), vec![1]);
        assert!(store.remove_bookmark("alice", 1).await.is_empty());
    }

    #[tokio::test]
    async fn test_least_recently_used_session_is_evicted() {
        let store = SessionStore::new(2).unwrap();
        store.record_play("a", episode(1)).await;
        store.record_play("b", episode(2)).await;
        store.record_play("c", episode(3)).await;

        assert!(store.recent("a").await.is_empty());
        assert_eq!(ids(&store.recent("b").await), vec![2]);
        assert_eq!(ids(&store.recent("c").await), vec![3]);
    }

    #[test]
    fn test_bookmarks_are_capped() {
        let mut bookmarks = Bookmarks::default();
        for id in 0..MAX_BOOKMARKS_PER_SESSION as u64 {
            assert!(bookmarks.add(episode(id)).unwrap());
        }

        let overflow = MAX_BOOKMARKS_PER_SESSION as u64;
        assert!(matches!(
            bookmarks.add(episode(overflow)),
            Err(PoducateError::InvalidInput(_))
        ));
        assert!(!bookmarks.add(episode(0)).unwrap());
        assert_eq!(bookmarks.episodes().len(), MAX_BOOKMARKS_PER_SESSION);
    }

    #[tokio::test]
    async fn test_reads_do_not_create_sessions() {
        let store = SessionStore::new(1).unwrap();
        store.add_bookmark("listener", episode(7)).await.unwrap();

        assert!(store.bookmarks("stranger").await.is_empty());
        assert!(store.recent("stranger").await.is_empty());
        assert!(store.remove_bookmark("stranger", 7).await.is_empty());

        assert_eq!(ids(&store.bookmarks("listener").await), vec![7]);
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        assert!(matches!(SessionStore::new(0), Err(PoducateError::Config(_))));
    }
}
