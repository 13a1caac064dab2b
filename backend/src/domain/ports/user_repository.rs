//! Port abstraction for user persistence adapters and their errors.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::user::EmailAddress;
use crate::domain::User;

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user store query failed: {message}",
        /// Another account already holds the email address.
        EmailTaken { email: String } => "email already registered: {email}",
    }
}

/// Driven port for the user store.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user, failing with [`UserPersistenceError::EmailTaken`]
    /// when the email address is already registered.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by login email.
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError>;
}

/// In-memory user store for tests and database-less development runs.
#[derive(Debug, Default)]
pub struct FixtureUserRepository {
    users: Mutex<Vec<User>>,
}

impl FixtureUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn with_users<T>(&self, f: impl FnOnce(&mut Vec<User>) -> T) -> T {
        let mut guard = self
            .users
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

#[async_trait]
impl UserRepository for FixtureUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        self.with_users(|users| {
            if users.iter().any(|stored| stored.email() == user.email()) {
                return Err(UserPersistenceError::email_taken(user.email().as_ref()));
            }
            users.push(user.clone());
            Ok(())
        })
    }

    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.with_users(|users| {
            users
                .iter()
                .find(|stored| stored.email() == email)
                .cloned()
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;

    fn user(email: &str) -> User {
        User::register(
            "Ada",
            EmailAddress::new(email).expect("valid email"),
            "hash",
        )
        .expect("valid user")
    }

    #[tokio::test]
    async fn insert_then_find_by_email() {
        let repo = FixtureUserRepository::new();
        let stored = user("ada@example.com");
        repo.insert(&stored).await.expect("insert succeeds");

        let found = repo
            .find_by_email(stored.email())
            .await
            .expect("lookup succeeds")
            .expect("user exists");
        assert_eq!(found.id(), stored.id());
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_email() {
        let repo = FixtureUserRepository::new();
        repo.insert(&user("ada@example.com"))
            .await
            .expect("first insert succeeds");

        let err = repo
            .insert(&user("ada@example.com"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(
            err,
            UserPersistenceError::email_taken("ada@example.com")
        );
    }

    #[tokio::test]
    async fn find_by_email_returns_none_for_unknown_address() {
        let repo = FixtureUserRepository::new();
        let found = repo
            .find_by_email(&EmailAddress::new("ghost@example.com").expect("valid email"))
            .await
            .expect("lookup succeeds");
        assert!(found.is_none());
    }
}
