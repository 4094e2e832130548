//! Client-local key/value storage.
//!
//! `SqliteStorage` persists entries in a single SQLite table so they survive
//! restarts, which is what a browser's `localStorage` gives the web client.
//! `MemoryStorage` keeps them in process and is used for demos and tests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend error: {0}")]
    Backend(#[from] sqlx::Error),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to resolve storage location: {0}")]
    Location(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// String key/value store scoped to this client.
#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

#[async_trait]
impl<T: LocalStorage + ?Sized> LocalStorage for Arc<T> {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_item(key).await
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set_item(key, value).await
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove_item(key).await
    }
}

/// In-process storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items<K, V>(items: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let items = items
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    pub fn len(&self) -> usize {
        self.items.read().map(|items| items.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StorageError {
    StorageError::Unavailable("memory storage lock poisoned".to_string())
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let items = self.items.read().map_err(|_| poisoned())?;
        Ok(items.get(key).cloned())
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let mut items = self.items.write().map_err(|_| poisoned())?;
        items.remove(key);
        Ok(())
    }
}

/// SQLite-backed storage (lazy initialization).
///
/// The pool is opened and the table created on first use. Clones share the
/// same pool.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    url: String,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteStorage {
    /// Storage at an explicit sqlx URL, e.g. `sqlite://path/to/storage.db`.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Non-persistent storage; entries vanish with the process.
    pub fn in_memory() -> Self {
        Self::new("sqlite::memory:")
    }

    pub fn at_path(path: impl AsRef<Path>) -> Self {
        Self::new(format!("sqlite://{}", path.as_ref().to_string_lossy()))
    }

    /// `{app_data_dir}/prodboard/storage.db`.
    pub fn default_location() -> Result<Self, StorageError> {
        Ok(Self::at_path(default_db_path()?))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn pool(&self) -> Result<SqlitePool, StorageError> {
        let mut guard = self.pool.lock().await;
        if let Some(pool) = guard.as_ref() {
            return Ok(pool.clone());
        }

        let options = SqliteConnectOptions::from_str(&self.url)?.create_if_missing(true);
        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        // One connection keeps `sqlite::memory:` a single shared database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS local_storage (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        tracing::debug!("opened local storage at {}", self.url);
        *guard = Some(pool.clone());
        Ok(pool)
    }
}

#[async_trait]
impl LocalStorage for SqliteStorage {
    async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        let pool = self.pool().await?;
        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value
            FROM local_storage
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(&pool)
        .await?;
        Ok(value)
    }

    async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let pool = self.pool().await?;
        sqlx::query(
            r#"
            INSERT INTO local_storage (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key)
            DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&pool)
        .await?;
        Ok(())
    }

    async fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        let pool = self.pool().await?;
        sqlx::query(
            r#"
            DELETE FROM local_storage
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .execute(&pool)
        .await?;
        Ok(())
    }
}

fn default_db_path() -> Result<PathBuf, StorageError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            StorageError::Location(
                "tried data_dir() and home_dir()/.local/share".to_string(),
            )
        })?;

    let mut path = base;
    path.push("prodboard");
    path.push("storage.db");
    Ok(path)
}
