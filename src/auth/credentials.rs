//! Credential store: registration, login and admin seeding.

use tracing::{debug, info};
use validator::Validate;

use crate::auth::PasswordService;
use crate::config::SeedAdmin;
use crate::db::{self, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{Role, User};

/// Length caps mirror the `users` column widths.
#[derive(Validate)]
struct NewAccount {
    #[validate(length(max = 50))]
    username: String,
    #[validate(length(max = 100))]
    email: String,
}

#[derive(Clone)]
pub struct CredentialStore {
    db: DbPool,
    passwords: PasswordService,
}

/// Trimmed value, or `None` when blank.
fn required(value: &str) -> Option<&str> {
    Some(value.trim()).filter(|v| !v.is_empty())
}

impl CredentialStore {
    pub fn new(db: DbPool, passwords: PasswordService) -> Self {
        Self { db, passwords }
    }

    /// Create an ordinary account.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> AppResult<User> {
        self.insert(username, email, password, Role::User).await
    }

    async fn insert(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AppResult<User> {
        let (Some(username), Some(email)) = (required(username), required(email)) else {
            return Err(AppError::fields_required());
        };
        if password.is_empty() {
            return Err(AppError::fields_required());
        }
        NewAccount {
            username: username.to_string(),
            email: email.to_string(),
        }
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

        let password_hash = self.passwords.hash(password).await?;

        let mut tx = self.db.begin().await?;
        if db::user_exists(&mut *tx, username, email).await? {
            debug!(%username, "registration rejected: duplicate");
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        // The unique constraints still decide races that get past the check above.
        let row = db::user_create(&mut *tx, username, email, &password_hash, role).await?;
        tx.commit().await?;

        info!(user_id = row.id, %username, %role, "user registered");
        row.into_user()
    }

    /// Check a username/password pair. Unknown user and wrong password are
    /// indistinguishable to the caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<User> {
        let Some(username) = required(username) else {
            return Err(AppError::Validation("Username and password are required".to_string()));
        };
        if password.is_empty() {
            return Err(AppError::Validation("Username and password are required".to_string()));
        }

        let Some(row) = db::user_find_by_username(&self.db, username).await? else {
            self.passwords.verify_missing(password).await?;
            debug!(%username, "login failed");
            return Err(AppError::InvalidCredentials);
        };
        if !self.passwords.verify(password, &row.password_hash).await? {
            debug!(%username, "login failed");
            return Err(AppError::InvalidCredentials);
        }
        row.into_user()
    }

    pub async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        db::user_find_by_username(&self.db, username)
            .await?
            .map(|row| row.into_user())
            .transpose()
    }

    /// Create the configured admin account unless that username is taken.
    pub async fn seed_admin(&self, admin: &SeedAdmin) -> AppResult<()> {
        if let Some(existing) = self.find_by_username(&admin.username).await? {
            debug!(username = %existing.username, role = %existing.role, "seed admin already present");
            return Ok(());
        }
        match self
            .insert(&admin.username, &admin.email, &admin.password, Role::Admin)
            .await
        {
            Ok(_) | Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        assert_eq!(required(" bob "), Some("bob"));
        assert_eq!(required(""), None);
        assert_eq!(required("   "), None);
    }

    #[test]
    fn account_fields_are_capped_at_column_width() {
        let long_name = "u".repeat(51);
        let ok = NewAccount {
            username: long_name[..50].to_string(),
            email: "a@example.com".into(),
        };
        assert!(ok.validate().is_ok());
        let too_long = NewAccount {
            username: long_name,
            email: "a@example.com".into(),
        };
        assert!(too_long.validate().is_err());
    }
}
