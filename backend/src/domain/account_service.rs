//! Account registration and login use-cases.

use std::sync::Arc;

use crate::domain::password::{hash_password, verify_password};
use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::token::TokenSigner;
use crate::domain::{Error, LoginCredentials, RegistrationDetails, User};

/// Result of a successful registration or login.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    /// Bearer token for subsequent requests.
    pub token: String,
    /// The account the token acts as.
    pub user: User,
}

/// Registers accounts and exchanges credentials for bearer tokens.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    tokens: TokenSigner,
}

impl AccountService {
    #[must_use]
    pub fn new(users: Arc<dyn UserRepository>, tokens: TokenSigner) -> Self {
        Self { users, tokens }
    }

    /// Create an account and log it in.
    ///
    /// A duplicate email caught by the pre-check reports as a validation
    /// failure; one that slips through to the insert (two concurrent
    /// registrations) reports as a conflict.
    pub async fn register(
        &self,
        details: &RegistrationDetails,
    ) -> Result<AuthenticatedAccount, Error> {
        if self
            .users
            .find_by_email(details.email())
            .await
            .map_err(store_unavailable)?
            .is_some()
        {
            return Err(Error::invalid_request("email already registered"));
        }

        let password_hash = hash_password(details.password())?;
        let user = User::register(details.name(), details.email().clone(), password_hash)
            .map_err(|error| Error::internal(format!("user construction failed: {error}")))?;

        self.users.insert(&user).await.map_err(|error| match error {
            UserPersistenceError::EmailTaken { .. } => {
                Error::conflict("email already registered")
            }
            other => store_unavailable(other),
        })?;

        let token = self.tokens.issue(user.id())?;
        Ok(AuthenticatedAccount { token, user })
    }

    /// Exchange credentials for a bearer token.
    ///
    /// Unknown email and wrong password report the same message so login
    /// cannot be used to probe which addresses are registered.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthenticatedAccount, Error> {
        let user = self
            .users
            .find_by_email(credentials.email())
            .await
            .map_err(store_unavailable)?
            .ok_or_else(invalid_credentials)?;

        if !verify_password(credentials.password(), user.password_hash()) {
            return Err(invalid_credentials());
        }

        let token = self.tokens.issue(user.id())?;
        Ok(AuthenticatedAccount { token, user })
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid email or password")
}

fn store_unavailable(error: UserPersistenceError) -> Error {
    tracing::error!(%error, "user store operation failed");
    Error::service_unavailable("user store unavailable")
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::FixtureUserRepository;
    use crate::domain::token::SigningKey;
    use crate::domain::ErrorCode;

    fn service() -> AccountService {
        AccountService::new(
            Arc::new(FixtureUserRepository::new()),
            TokenSigner::new(&SigningKey::generate()),
        )
    }

    fn registration(email: &str) -> RegistrationDetails {
        RegistrationDetails::try_from_parts("Ada Lovelace", email, "s3cret")
            .expect("valid registration")
    }

    #[tokio::test]
    async fn register_returns_a_verifiable_token() {
        let service = service();
        let account = service
            .register(&registration("ada@example.com"))
            .await
            .expect("registration succeeds");

        assert_eq!(account.user.email().as_ref(), "ada@example.com");
        let verified = service
            .tokens
            .verify(&account.token)
            .expect("token verifies");
        assert_eq!(&verified, account.user.id());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let service = service();
        service
            .register(&registration("ada@example.com"))
            .await
            .expect("first registration succeeds");

        let err = service
            .register(&registration("ada@example.com"))
            .await
            .expect_err("duplicate email must fail");
        assert_eq!(err.code, ErrorCode::InvalidRequest);
        assert_eq!(err.message, "email already registered");
    }

    #[tokio::test]
    async fn login_round_trips_registered_credentials() {
        let service = service();
        let registered = service
            .register(&registration("ada@example.com"))
            .await
            .expect("registration succeeds");

        let credentials = LoginCredentials::try_from_parts("ada@example.com", "s3cret")
            .expect("valid credentials");
        let account = service.login(&credentials).await.expect("login succeeds");
        assert_eq!(account.user.id(), registered.user.id());
    }

    #[tokio::test]
    async fn login_does_not_reveal_which_credential_was_wrong() {
        let service = service();
        service
            .register(&registration("ada@example.com"))
            .await
            .expect("registration succeeds");

        let wrong_password = LoginCredentials::try_from_parts("ada@example.com", "nope")
            .expect("valid credentials");
        let unknown_email = LoginCredentials::try_from_parts("ghost@example.com", "s3cret")
            .expect("valid credentials");

        let first = service
            .login(&wrong_password)
            .await
            .expect_err("wrong password must fail");
        let second = service
            .login(&unknown_email)
            .await
            .expect_err("unknown email must fail");
        assert_eq!(first.code, ErrorCode::Unauthorized);
        assert_eq!(first.message, second.message);
    }

    #[tokio::test]
    async fn passwords_are_stored_hashed() {
        let service = service();
        let account = service
            .register(&registration("ada@example.com"))
            .await
            .expect("registration succeeds");
        assert_ne!(account.user.password_hash(), "s3cret");
        assert!(account.user.password_hash().starts_with("$argon2"));
    }
}
