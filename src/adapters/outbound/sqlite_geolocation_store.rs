//! SQLite Geolocation Store
//!
//! Implements GeolocationStore on a single SQLite table. Records are kept as
//! JSON documents so the payload stays schema-flexible.

use crate::domain::entities::{CatalogueEntry, GeolocationRecord};
use crate::domain::errors::StoreError;
use crate::domain::ports::GeolocationStore;
use crate::domain::value_objects::NormalizedAddress;
use crate::infrastructure::RetryPolicy;
use async_trait::async_trait;
use parking_lot::Mutex;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::sync::Arc;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_millis(100);

/// SQLite-backed geolocation store.
///
/// One connection shared behind a mutex; blocking calls run on the
/// blocking thread pool. Every operation runs under the store's
/// `RetryPolicy`, which only retries busy/locked/I-O failures.
pub struct SqliteGeolocationStore {
    conn: Arc<Mutex<Connection>>,
    retry: RetryPolicy,
}

impl SqliteGeolocationStore {
    /// Open (or create) a database file and make sure the schema exists.
    pub fn open(db_path: &str) -> anyhow::Result<Self> {
        let conn = Connection::open(db_path)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, mostly for tests.
    pub fn in_memory() -> anyhow::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> anyhow::Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
            retry: RetryPolicy::default(),
        };
        store.init_schema()?;
        Ok(store)
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Initialize the database schema.
    pub fn init_schema(&self) -> anyhow::Result<()> {
        self.conn.lock().execute(
            "CREATE TABLE IF NOT EXISTS ip_geolocation (
                ip TEXT PRIMARY KEY NOT NULL,
                geolocation TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Run `op` on the blocking pool, retrying transient failures.
    async fn with_conn<T, F>(&self, operation: &str, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: Fn(&mut Connection) -> Result<T, StoreError> + Send + Sync + 'static,
    {
        let op = Arc::new(op);
        self.retry
            .run(
                operation,
                || {
                    let conn = self.conn.clone();
                    let op = op.clone();
                    async move {
                        match tokio::task::spawn_blocking(move || {
                            let mut guard = conn.lock();
                            op(&mut guard)
                        })
                        .await
                        {
                            Ok(result) => result,
                            Err(e) => Err(StoreError::Backend(format!("blocking task failed: {}", e))),
                        }
                    }
                },
                StoreError::is_transient,
            )
            .await
    }

    fn encode(record: &GeolocationRecord) -> Result<String, StoreError> {
        serde_json::to_string(record).map_err(|e| StoreError::Backend(e.to_string()))
    }
}

/// Map a SQLite error onto the store error taxonomy.
fn classify(err: rusqlite::Error) -> StoreError {
    match err.sqlite_error_code() {
        Some(ErrorCode::DatabaseBusy)
        | Some(ErrorCode::DatabaseLocked)
        | Some(ErrorCode::SystemIoFailure)
        | Some(ErrorCode::CannotOpen) => StoreError::Transient(err.to_string()),
        _ => StoreError::Backend(err.to_string()),
    }
}

#[async_trait]
impl GeolocationStore for SqliteGeolocationStore {
    async fn get(&self, key: &NormalizedAddress) -> Result<Option<CatalogueEntry>, StoreError> {
        let ip = key.as_str().to_string();
        let doc: Option<String> = self
            .with_conn("store get", move |conn| {
                conn.query_row(
                    "SELECT geolocation FROM ip_geolocation WHERE ip = ?1",
                    [&ip],
                    |row| row.get(0),
                )
                .optional()
                .map_err(classify)
            })
            .await?;

        match doc {
            Some(doc) => {
                let geolocation: GeolocationRecord =
                    serde_json::from_str(&doc).map_err(|e| StoreError::Corrupt {
                        key: key.to_string(),
                        reason: e.to_string(),
                    })?;
                Ok(Some(CatalogueEntry::new(key.as_str(), geolocation)))
            }
            None => Ok(None),
        }
    }

    async fn put(
        &self,
        key: &NormalizedAddress,
        record: GeolocationRecord,
    ) -> Result<CatalogueEntry, StoreError> {
        let doc = Self::encode(&record)?;
        let ip = key.as_str().to_string();

        self.with_conn("store put", move |conn| {
            let tx = conn.transaction().map_err(classify)?;
            tx.execute(
                "INSERT INTO ip_geolocation (ip, geolocation) VALUES (?1, ?2)",
                params![ip, doc],
            )
            .map_err(|e| match e.sqlite_error_code() {
                Some(ErrorCode::ConstraintViolation) => StoreError::Conflict(ip.clone()),
                _ => classify(e),
            })?;
            tx.commit().map_err(classify)
        })
        .await?;

        tracing::debug!("stored geolocation for {}", key);
        Ok(CatalogueEntry::new(key.as_str(), record))
    }

    async fn update(
        &self,
        entry: &CatalogueEntry,
        record: GeolocationRecord,
    ) -> Result<CatalogueEntry, StoreError> {
        let doc = Self::encode(&record)?;
        let ip = entry.ip.clone();

        self.with_conn("store update", move |conn| {
            let tx = conn.transaction().map_err(classify)?;
            let changed = tx
                .execute(
                    "UPDATE ip_geolocation SET geolocation = ?1 WHERE ip = ?2",
                    params![doc, ip],
                )
                .map_err(classify)?;
            if changed == 0 {
                return Err(StoreError::Missing(ip.clone()));
            }
            tx.commit().map_err(classify)
        })
        .await?;

        tracing::debug!("updated geolocation for {}", entry.ip);
        Ok(CatalogueEntry::new(entry.ip.clone(), record))
    }

    async fn delete(&self, entry: &CatalogueEntry) -> Result<(), StoreError> {
        let ip = entry.ip.clone();

        self.with_conn("store delete", move |conn| {
            let tx = conn.transaction().map_err(classify)?;
            tx.execute("DELETE FROM ip_geolocation WHERE ip = ?1", [&ip])
                .map_err(classify)?;
            tx.commit().map_err(classify)
        })
        .await?;

        tracing::debug!("deleted geolocation for {}", entry.ip);
        Ok(())
    }
}
