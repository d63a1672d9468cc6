//! # User Repository
//!
//! Accounts are documents like everything else, but the table carries a
//! denormalized `email` column under a unique index so that duplicate
//! registration is rejected by storage and email lookup doesn't scan
//! documents.
//!
//! Email matching is exact and case-sensitive, through the index.

use sqlx::sqlite::Sqlite;
use sqlx::{Executor, SqlitePool};
use tracing::debug;

use formulary_core::User;

use crate::error::{DbError, DbResult};

pub(crate) const TABLE: &str = "users";

/// Repository for local user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts or replaces a user.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - another account owns this email
    pub async fn put(&self, user: &User) -> DbResult<()> {
        debug!(id = %user.id, "Putting user");
        put_user(&self.pool, user).await
    }

    /// Looks a user up by exact email.
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        let doc: Option<String> =
            sqlx::query_scalar("SELECT doc FROM users WHERE email = ?1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    /// Looks a user up by id.
    pub async fn get(&self, id: &str) -> DbResult<Option<User>> {
        let doc: Option<String> = sqlx::query_scalar("SELECT doc FROM users WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match doc {
            Some(doc) => Ok(Some(serde_json::from_str(&doc)?)),
            None => Ok(None),
        }
    }

    /// Returns every account.
    pub async fn get_all(&self) -> DbResult<Vec<User>> {
        fetch_users(&self.pool).await
    }

    /// Removes an account unconditionally.
    pub async fn remove(&self, id: &str) -> DbResult<()> {
        sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Counts accounts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

// =============================================================================
// Executor-level helpers (shared with backup.rs transactions)
// =============================================================================

pub(crate) async fn fetch_users<'c, E>(executor: E) -> DbResult<Vec<User>>
where
    E: Executor<'c, Database = Sqlite>,
{
    let docs: Vec<String> = sqlx::query_scalar("SELECT doc FROM users")
        .fetch_all(executor)
        .await?;

    docs.iter()
        .map(|doc| serde_json::from_str(doc).map_err(Into::into))
        .collect()
}

pub(crate) async fn put_user<'c, E>(executor: E, user: &User) -> DbResult<()>
where
    E: Executor<'c, Database = Sqlite>,
{
    let doc = serde_json::to_string(user)?;

    let result = sqlx::query(
        "INSERT INTO users (id, email, doc) VALUES (?1, ?2, ?3) \
         ON CONFLICT(id) DO UPDATE SET email = excluded.email, doc = excluded.doc",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(doc)
    .execute(executor)
    .await;

    match result {
        Ok(_) => Ok(()),
        // Re-shape the index violation so callers see which email clashed.
        Err(err) => match DbError::from(err) {
            DbError::UniqueViolation { .. } => Err(DbError::duplicate("email", &user.email)),
            other => Err(other),
        },
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use crate::error::DbError;
    use crate::pool::{Database, DbConfig};
    use formulary_core::User;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "s3cret".to_string(),
        }
    }

    #[tokio::test]
    async fn lookup_by_email_is_exact() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.put(&user("1", "ana@farmacia.com")).await.unwrap();

        assert!(users
            .get_by_email("ana@farmacia.com")
            .await
            .unwrap()
            .is_some());
        // Case-sensitive through the index.
        assert!(users
            .get_by_email("ANA@farmacia.com")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn second_account_with_same_email_is_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.put(&user("1", "ana@farmacia.com")).await.unwrap();
        let err = users.put(&user("2", "ana@farmacia.com")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { .. }));
        assert_eq!(users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn put_same_id_updates_in_place() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.put(&user("1", "ana@farmacia.com")).await.unwrap();
        users.put(&user("1", "ana@nova.com")).await.unwrap();

        assert_eq!(users.count().await.unwrap(), 1);
        assert!(users.get_by_email("ana@nova.com").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn remove_deletes_the_account() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let users = db.users();

        users.put(&user("1", "ana@farmacia.com")).await.unwrap();
        users.remove("1").await.unwrap();

        assert!(users.get("1").await.unwrap().is_none());
    }
}
