//! # Auth Service
//!
//! Local accounts against the on-device store. Registration, login,
//! password reset and account deletion all resolve here; there is no
//! remote identity provider and no session state beyond "the host keeps
//! the returned [`User`]".
//!
//! Passwords are compared in plaintext. The store never leaves the device,
//! so the account exists to personalize the UI, not to defend data.

use tracing::{info, warn};

use formulary_core::ids::timestamp_id;
use formulary_core::validation::{validate_email, validate_registration, validate_required};
use formulary_core::{User, ValidationError};
use formulary_db::{Database, DbError};

use thiserror::Error;

/// Auth failures, phrased the way the UI reports them.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Another account already owns this email.
    #[error("an account with this email already exists")]
    DuplicateUser,

    /// Unknown email or wrong password; which one is deliberately not
    /// disclosed.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Password reset for an email no account owns.
    #[error("no account found for this email")]
    UserNotFound,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Account operations over the local store.
#[derive(Debug, Clone)]
pub struct AuthService {
    db: Database,
}

impl AuthService {
    pub fn new(db: Database) -> Self {
        AuthService { db }
    }

    /// Registers a new account and returns it logged in.
    ///
    /// ## Returns
    /// * `Err(AuthError::DuplicateUser)` - the email is taken
    pub async fn register(&self, name: &str, email: &str, password: &str) -> AuthResult<User> {
        validate_registration(name, email, password)?;

        let user = User {
            id: timestamp_id(),
            name: name.trim().to_string(),
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        match self.db.users().put(&user).await {
            Ok(()) => {
                info!(email = %user.email, "Registered account");
                Ok(user)
            }
            Err(DbError::UniqueViolation { .. }) => Err(AuthError::DuplicateUser),
            Err(err) => Err(err.into()),
        }
    }

    /// Logs in with email and password.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<User> {
        let user = self.db.users().get_by_email(email.trim()).await?;

        match user {
            Some(user) if user.password == password => {
                info!(email = %user.email, "Logged in");
                Ok(user)
            }
            _ => {
                warn!(email = email.trim(), "Failed login attempt");
                Err(AuthError::InvalidCredentials)
            }
        }
    }

    /// Replaces the password of the account owning `email`.
    ///
    /// ## Returns
    /// * `Err(AuthError::UserNotFound)` - no account owns this email
    pub async fn reset_password(&self, email: &str, new_password: &str) -> AuthResult<()> {
        validate_email(email)?;
        validate_required("password", new_password)?;

        let Some(mut user) = self.db.users().get_by_email(email.trim()).await? else {
            return Err(AuthError::UserNotFound);
        };

        user.password = new_password.to_string();
        self.db.users().put(&user).await?;
        info!(email = %user.email, "Password reset");
        Ok(())
    }

    /// Deletes an account. The user's data (history, catalog, settings)
    /// stays; accounts only gate the UI.
    pub async fn delete_account(&self, id: &str) -> AuthResult<()> {
        self.db.users().remove(id).await?;
        info!(id, "Deleted account");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use formulary_db::DbConfig;

    async fn service() -> AuthService {
        AuthService::new(Database::new(DbConfig::in_memory()).await.unwrap())
    }

    #[tokio::test]
    async fn register_then_login() {
        let auth = service().await;
        auth.register("Ana", "ana@farmacia.com", "s3cret").await.unwrap();

        let user = auth.login("ana@farmacia.com", "s3cret").await.unwrap();
        assert_eq!(user.name, "Ana");
    }

    #[tokio::test]
    async fn duplicate_registration_leaves_store_unchanged() {
        let auth = service().await;
        auth.register("Ana", "ana@farmacia.com", "s3cret").await.unwrap();

        let err = auth
            .register("Outra Ana", "ana@farmacia.com", "other")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::DuplicateUser));

        assert_eq!(auth.db.users().count().await.unwrap(), 1);
        // The original credentials still work.
        auth.login("ana@farmacia.com", "s3cret").await.unwrap();
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_read_the_same() {
        let auth = service().await;
        auth.register("Ana", "ana@farmacia.com", "s3cret").await.unwrap();

        let wrong_password = auth.login("ana@farmacia.com", "nope").await.unwrap_err();
        let unknown_email = auth.login("ghost@farmacia.com", "nope").await.unwrap_err();

        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn reset_password_requires_existing_account() {
        let auth = service().await;

        let err = auth
            .reset_password("ghost@farmacia.com", "new")
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));

        auth.register("Ana", "ana@farmacia.com", "s3cret").await.unwrap();
        auth.reset_password("ana@farmacia.com", "newpass").await.unwrap();

        auth.login("ana@farmacia.com", "newpass").await.unwrap();
        assert!(auth.login("ana@farmacia.com", "s3cret").await.is_err());
    }

    #[tokio::test]
    async fn register_validates_input() {
        let auth = service().await;
        let err = auth.register("", "ana@farmacia.com", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));

        let err = auth.register("Ana", "not-an-email", "pw").await.unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn delete_account_removes_only_the_account() {
        let auth = service().await;
        let user = auth.register("Ana", "ana@farmacia.com", "s3cret").await.unwrap();

        auth.delete_account(&user.id).await.unwrap();
        assert!(auth.login("ana@farmacia.com", "s3cret").await.is_err());
    }
}
