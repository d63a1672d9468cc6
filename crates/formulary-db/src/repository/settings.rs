//! # Settings Repository
//!
//! Generic key/value store for UI preferences, flags, the language tag and
//! the custom icon map. Values are opaque JSON; typed accessors are a
//! convenience on top.

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::Sqlite;
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use formulary_core::SettingRecord;

use crate::error::DbResult;

pub(crate) const TABLE: &str = "settings";

/// Repository for keyed settings.
#[derive(Debug, Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        SettingsRepository { pool }
    }

    /// Returns the raw JSON value for a key, or None.
    pub async fn get(&self, key: &str) -> DbResult<Option<serde_json::Value>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM settings WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        match value {
            Some(value) => Ok(Some(serde_json::from_str(&value)?)),
            None => Ok(None),
        }
    }

    /// Returns a typed setting, or None when the key is absent.
    ///
    /// A present-but-mismatched value is an error, not None: a corrupted
    /// setting should be visible, not silently reset.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> DbResult<Option<T>> {
        match self.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Inserts or replaces a setting.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> DbResult<()> {
        debug!(key, "Setting value");
        let value = serde_json::to_string(value)?;

        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?1, ?2) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Removes a setting. Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM settings WHERE key = ?1")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Returns every setting as records (for backup).
    pub async fn get_all(&self) -> DbResult<Vec<SettingRecord>> {
        fetch_settings(&self.pool).await
    }
}

// =============================================================================
// Executor-level helpers (shared with backup.rs transactions)
// =============================================================================

pub(crate) async fn fetch_settings<'c, E>(executor: E) -> DbResult<Vec<SettingRecord>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT key, value FROM settings")
        .fetch_all(executor)
        .await?;

    rows.into_iter()
        .map(|(key, value)| {
            Ok(SettingRecord {
                key,
                value: serde_json::from_str(&value)?,
            })
        })
        .collect()
}

pub(crate) async fn put_setting<'c, E>(executor: E, record: &SettingRecord) -> DbResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let value = serde_json::to_string(&record.value)?;

    sqlx::query(
        "INSERT INTO settings (key, value) VALUES (?1, ?2) \
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
    )
    .bind(&record.key)
    .bind(value)
    .execute(executor)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
