//! Authentication payload primitives.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::user::{EmailAddress, UserValidationError, NAME_MAX};

/// Domain error returned when login or registration payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialValidationError {
    InvalidEmail,
    EmptyPassword,
    EmptyName,
    NameTooLong { max: usize },
}

impl fmt::Display for CredentialValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email address is not valid"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for CredentialValidationError {}

impl From<UserValidationError> for CredentialValidationError {
    fn from(value: UserValidationError) -> Self {
        match value {
            UserValidationError::EmptyName => Self::EmptyName,
            UserValidationError::NameTooLong { max } => Self::NameTooLong { max },
            _ => Self::InvalidEmail,
        }
    }
}

/// Validated login credentials used by the account service.
///
/// ## Invariants
/// - `email` satisfies [`EmailAddress`] validation.
/// - `password` is non-empty but retains caller-provided whitespace to avoid
///   surprising credential comparisons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let email =
            EmailAddress::new(email).map_err(|_| CredentialValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used for the user lookup.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationDetails {
    name: String,
    email: EmailAddress,
    password: Zeroizing<String>,
}

impl RegistrationDetails {
    /// Construct registration details from raw inputs.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Self, CredentialValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CredentialValidationError::EmptyName);
        }
        if trimmed.chars().count() > NAME_MAX {
            return Err(CredentialValidationError::NameTooLong { max: NAME_MAX });
        }
        let email =
            EmailAddress::new(email).map_err(|_| CredentialValidationError::InvalidEmail)?;
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            name: trimmed.to_owned(),
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Display name for the new account.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Email address for the new account.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Plaintext password to be hashed before storage.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
