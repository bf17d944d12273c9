use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use bb8_redis::{redis, RedisConnectionManager};

use crate::{
    database::Datastore,
    errors::{
        constants::{REDIS_CONNECTION_TIMEOUT_SECS, REDIS_MAX_CONNECTIONS},
        PoducateError, Result,
    },
};

#[derive(Clone)]
pub struct Database {
    pool: bb8::Pool<RedisConnectionManager>,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("connections", &self.pool.state().connections)
            .finish()
    }
}

impl Database {
    /// Connections are opened lazily, so an unreachable server only shows up
    /// when the datastore is first used.
    pub fn connect(url: &str) -> Result<Self> {
        let manager = RedisConnectionManager::new(url)?;
        let pool = bb8::Pool::builder()
            .max_size(REDIS_MAX_CONNECTIONS)
            .connection_timeout(Duration::from_secs(REDIS_CONNECTION_TIMEOUT_SECS))
            .build_unchecked(manager);

        Ok(Self { pool })
    }
}

#[async_trait]
impl Datastore for Database {
    #[tracing::instrument(name = "datastore_time", skip(self))]
    async fn now(&self) -> Result<SystemTime> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| PoducateError::database(format!("Failed to get connection: {}", e)))?;

        let (secs, micros): (u64, u64) = redis::cmd("TIME").query_async(&mut *conn).await?;
        Ok(UNIX_EPOCH + Duration::from_secs(secs) + Duration::from_micros(micros))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_is_rejected() {
        assert!(matches!(
            Database::connect("not a url"),
            Err(PoducateError::Redis(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_is_lazy() {
        assert!(Database::connect("redis://127.0.0.1:1/").is_ok());
    }
}
