pub mod database;

use std::time::SystemTime;

use async_trait::async_trait;

use crate::errors::Result;

pub use database::Database;

/// A datastore that can be probed for liveness.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Datastore: Send + Sync {
    /// Current time according to the datastore.
    async fn now(&self) -> Result<SystemTime>;
}
