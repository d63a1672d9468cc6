//! # Generic Document Collections
//!
//! The storage model: every entity lives in its own table shaped
//! `(id TEXT PRIMARY KEY, doc TEXT)`, where `doc` is the JSON-serialized
//! entity. This mirrors the object-store layout the original application
//! used and keeps the gateway a thin key/value wrapper.
//!
//! ## Collection Access
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Generic Collection Pattern                           │
//! │                                                                         │
//! │  AppController                                                         │
//! │       │                                                                 │
//! │       │  db.history().put(&item)                                       │
//! │       ▼                                                                 │
//! │  Collection<HistoryItem>        ← one generic impl for all entities    │
//! │  ├── get_all()                                                         │
//! │  ├── get(key)                                                          │
//! │  ├── put(item)          (insert-or-replace)                            │
//! │  ├── remove(key)                                                       │
//! │  └── clear()                                                           │
//! │       │                                                                 │
//! │       │  SELECT doc FROM history ...                                   │
//! │       ▼                                                                 │
//! │  SQLite (JSON document per row)                                        │
//! │                                                                         │
//! │  Each call runs in its own implicit transaction. The multi-collection  │
//! │  transactions live in backup.rs.                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Table names come from the `Document::COLLECTION` constant, so the
//! `format!`-assembled SQL never contains runtime input.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::Sqlite;
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use formulary_core::{Formula, HistoryItem, Product, SavedPrescription};

use crate::error::DbResult;

// =============================================================================
// Document Trait
// =============================================================================

/// A JSON-storable entity with a string primary key.
pub trait Document: Serialize + DeserializeOwned + Send + Sync + Unpin {
    /// Table this entity lives in.
    const COLLECTION: &'static str;

    /// Primary key of this instance.
    fn key(&self) -> &str;
}

impl Document for HistoryItem {
    const COLLECTION: &'static str = "history";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Document for Formula {
    const COLLECTION: &'static str = "saved_formulas";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Document for Product {
    const COLLECTION: &'static str = "products";

    fn key(&self) -> &str {
        &self.id
    }
}

impl Document for SavedPrescription {
    const COLLECTION: &'static str = "saved_prescriptions";

    fn key(&self) -> &str {
        &self.id
    }
}

// =============================================================================
// Executor-level helpers (shared with backup.rs transactions)
// =============================================================================

pub(crate) async fn fetch_all_docs<'c, T, E>(executor: E) -> DbResult<Vec<T>>
where
    T: Document,
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!("SELECT doc FROM {}", T::COLLECTION);
    let docs: Vec<String> = sqlx::query_scalar(&sql).fetch_all(executor).await?;

    docs.iter()
        .map(|doc| serde_json::from_str(doc).map_err(Into::into))
        .collect()
}

pub(crate) async fn put_doc<'c, T, E>(executor: E, item: &T) -> DbResult<()>
where
    T: Document,
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!(
        "INSERT INTO {} (id, doc) VALUES (?1, ?2) \
         ON CONFLICT(id) DO UPDATE SET doc = excluded.doc",
        T::COLLECTION
    );
    let doc = serde_json::to_string(item)?;

    sqlx::query(&sql)
        .bind(item.key())
        .bind(doc)
        .execute(executor)
        .await?;

    Ok(())
}

pub(crate) async fn clear_docs<'c, E>(executor: E, collection: &str) -> DbResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let sql = format!("DELETE FROM {collection}");
    sqlx::query(&sql).execute(executor).await?;
    Ok(())
}

// =============================================================================
// Collection
// =============================================================================

/// Typed handle to one document table.
///
/// Cheap to construct (clones the pool handle); hand one out per call
/// rather than caching it.
#[derive(Debug, Clone)]
pub struct Collection<T> {
    pool: SqlitePool,
    _marker: PhantomData<T>,
}

impl<T: Document> Collection<T> {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Collection {
            pool,
            _marker: PhantomData,
        }
    }

    /// Returns every document in the collection, in unspecified order.
    /// Callers own sort order (history by timestamp, catalog by name, ...).
    pub async fn get_all(&self) -> DbResult<Vec<T>> {
        let items = fetch_all_docs::<T, _>(&self.pool).await?;
        debug!(collection = T::COLLECTION, count = items.len(), "Loaded collection");
        Ok(items)
    }

    /// Returns one document by key, or None.
    pub async fn get(&self, key: &str) -> DbResult<Option<T>> {
        let sql = format!("SELECT doc FROM {} WHERE id = ?1", T::COLLECTION);
        let doc: Option<String> = sqlx::query_scalar(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    /// Inserts or replaces a document.
    pub async fn put(&self, item: &T) -> DbResult<()> {
        debug!(collection = T::COLLECTION, key = item.key(), "Putting document");
        put_doc(&self.pool, item).await
    }

    /// Removes a document by key. Removing an absent key is not an error.
    pub async fn remove(&self, key: &str) -> DbResult<()> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", T::COLLECTION);
        sqlx::query(&sql).bind(key).execute(&self.pool).await?;
        Ok(())
    }

    /// Deletes every document in the collection.
    pub async fn clear(&self) -> DbResult<()> {
        debug!(collection = T::COLLECTION, "Clearing collection");
        clear_docs(&self.pool, T::COLLECTION).await
    }

    /// Counts documents (for diagnostics and tests).
    pub async fn count(&self) -> DbResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::COLLECTION);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
