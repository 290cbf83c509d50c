//! Handle to the document store.
//!
//! A `Store` pairs a pooled database connection with the namespace (the configured
//! database name) every collection lives in, and the deadline applied to each
//! repository call. Clones share the connection pool.

use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use sea_orm::DatabaseConnection;

use crate::server::{data::repository::Repository, error::store::StoreError};

/// Deadline applied to every repository call unless configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone, Debug)]
pub struct Store {
    db: DatabaseConnection,
    namespace: String,
    timeout: Duration,
}

impl Store {
    /// Creates a store over an already connected and migrated database.
    ///
    /// # Arguments
    /// - `db` - Connection pool holding the documents table
    /// - `namespace` - Logical database name scoping every collection
    ///
    /// # Returns
    /// - `Store` - Handle using the default 10 second call deadline
    pub fn new(db: DatabaseConnection, namespace: impl Into<String>) -> Self {
        Self {
            db,
            namespace: namespace.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns a typed repository over `collection`.
    pub fn repository<T>(&self, collection: &str) -> Repository<T>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
    {
        Repository::new(self.clone(), collection)
    }

    /// Checks that the store answers within the call deadline.
    ///
    /// # Returns
    /// - `Ok(())` - Store is reachable
    /// - `Err(StoreError::Unavailable)` - Connection failed
    /// - `Err(StoreError::Timeout)` - No answer before the deadline
    pub async fn ping(&self) -> Result<(), StoreError> {
        crate::server::data::repository::bounded(self.timeout, async {
            self.db.ping().await?;
            Ok(())
        })
        .await
    }

    /// Closes the underlying pool. Other clones of this store stop working.
    pub async fn close(self) -> Result<(), StoreError> {
        self.db.close().await?;
        Ok(())
    }
}
