//! SQLite-backed key-value records.

use std::path::{Path, PathBuf};

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, SqlitePool};
use tokio::runtime::Runtime;

use crate::error::{StoreError, StoreResult};

use super::KeyValueBackend;

/// One `kv_store` table in a SQLite file.
///
/// The ledger API is synchronous, so every call blocks on a private
/// current-thread runtime. Do not call it from inside another async runtime.
#[derive(Debug)]
pub struct SqliteBackend {
    pool: SqlitePool,
    runtime: Runtime,
    path: PathBuf,
}

impl SqliteBackend {
    /// Open (creating if needed) the database at `path`.
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);

        let pool = runtime
            .block_on(async {
                let pool = SqlitePoolOptions::new()
                    .max_connections(1)
                    .connect_with(options)
                    .await?;

                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS kv_store (
                        key         TEXT PRIMARY KEY,
                        value       TEXT NOT NULL,
                        updated_at  TEXT NOT NULL
                    )
                    "#,
                )
                .execute(&pool)
                .await?;

                Ok::<_, sqlx::Error>(pool)
            })
            .map_err(|source| StoreError::Open {
                path: path.clone(),
                source,
            })?;

        tracing::debug!(path = %path.display(), "opened ledger database");

        Ok(Self {
            pool,
            runtime,
            path,
        })
    }

    /// Open the database at the default location (see [`default_db_path`]).
    pub fn open_default() -> StoreResult<Self> {
        Self::open(default_db_path()?)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl KeyValueBackend for SqliteBackend {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let row = self.runtime.block_on(
            sqlx::query(
                r#"
                SELECT value
                FROM kv_store
                WHERE key = ?1
                "#,
            )
            .bind(key)
            .fetch_optional(&self.pool),
        )?;

        match row {
            Some(row) => Ok(Some(row.try_get("value")?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let now = Utc::now().to_rfc3339();

        self.runtime.block_on(
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key)
                DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(&now)
            .execute(&self.pool),
        )?;

        Ok(())
    }

    fn remove(&self, key: &str) -> StoreResult<()> {
        self.runtime.block_on(
            sqlx::query(
                r#"
                DELETE FROM kv_store
                WHERE key = ?1
                "#,
            )
            .bind(key)
            .execute(&self.pool),
        )?;

        Ok(())
    }
}

impl Drop for SqliteBackend {
    fn drop(&mut self) {
        self.runtime.block_on(self.pool.close());
    }
}

/// Resolve the path to the ledger database:
/// `{app_data_dir}/quotedesk/ledger.db`.
pub fn default_db_path() -> StoreResult<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut home| {
                home.push(".local");
                home.push("share");
                home
            })
        })
        .ok_or_else(|| {
            StoreError::backend(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share",
            )
        })?;

    dir.push("quotedesk");
    dir.push("ledger.db");

    Ok(dir)
}
