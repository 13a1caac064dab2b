//! Bearer-token issuance and verification (the auth gate).
//!
//! Tokens are HS256 JWTs carrying `{sub, iat, exp}`. The signing key is an
//! explicitly constructed configuration value passed in at construction time;
//! rotating it invalidates every outstanding token (no key versioning is
//! supported — a documented limitation, not a bug).

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::{Error, UserId};

/// Token lifetime in days.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// Verification failures, each mapped to a distinct unauthorized reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthTokenError {
    /// The embedded expiry has passed.
    #[error("token expired")]
    Expired,
    /// The token cannot be parsed or its signature does not verify.
    #[error("invalid token")]
    Malformed,
    /// The decoded payload lacks a usable subject claim.
    #[error("token missing subject")]
    MissingSubject,
}

/// HMAC signing key, process-wide configuration loaded once at startup.
#[derive(Clone)]
pub struct SigningKey(Zeroizing<Vec<u8>>);

impl SigningKey {
    /// Wrap raw key material.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    /// Generate a random 32-byte key for development use.
    #[must_use]
    pub fn generate() -> Self {
        use rand_core::{OsRng, RngCore};

        let mut bytes = vec![0_u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(bytes))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SigningKey(..)")
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
    #[serde(default)]
    iat: i64,
    exp: i64,
}

/// Issues and verifies the bearer tokens protecting every data route.
///
/// # Examples
/// ```
/// use backend::domain::{SigningKey, TokenSigner, UserId};
///
/// let signer = TokenSigner::new(&SigningKey::from_bytes(*b"0123456789abcdef0123456789abcdef"));
/// let user = UserId::random();
/// let token = signer.issue(&user).expect("token issues");
/// assert_eq!(signer.verify(&token).expect("token verifies"), user);
/// ```
#[derive(Clone)]
pub struct TokenSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenSigner {
    /// Construct a signer/verifier pair from the configured key.
    #[must_use]
    pub fn new(key: &SigningKey) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry checks are exact; the default 60s leeway would let freshly
        // expired tokens through.
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(key.as_bytes()),
            decoding: DecodingKey::from_secret(key.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `user` expiring [`TOKEN_TTL_DAYS`] from now.
    pub fn issue(&self, user: &UserId) -> Result<String, Error> {
        self.issue_with_lifetime(user, Duration::days(TOKEN_TTL_DAYS))
    }

    /// Issue a token with an explicit lifetime (negative lifetimes produce
    /// already-expired tokens; useful for expiry tests).
    pub fn issue_with_lifetime(
        &self,
        user: &UserId,
        lifetime: Duration,
    ) -> Result<String, Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: Some(user.to_string()),
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|error| Error::internal(format!("failed to sign token: {error}")))
    }

    /// Verify a presented token and extract the acting identity.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthTokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(
            |error| match error.kind() {
                ErrorKind::ExpiredSignature => AuthTokenError::Expired,
                _ => AuthTokenError::Malformed,
            },
        )?;
        let Some(subject) = data.claims.sub.filter(|sub| !sub.is_empty()) else {
            return Err(AuthTokenError::MissingSubject);
        };
        UserId::new(subject).map_err(|_| AuthTokenError::Malformed)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SigningKey::from_bytes(&b"test-signing-key-32-bytes-long!!"[..]))
    }

    #[test]
    fn issue_then_verify_returns_same_identity() {
        let signer = signer();
        let user = UserId::random();
        let token = signer.issue(&user).expect("token issues");
        assert_eq!(signer.verify(&token).expect("token verifies"), user);
    }

    #[test]
    fn expired_token_fails_with_expired() {
        let signer = signer();
        let token = signer
            .issue_with_lifetime(&UserId::random(), Duration::days(-1))
            .expect("token issues");
        assert_eq!(signer.verify(&token), Err(AuthTokenError::Expired));
    }

    #[test]
    fn tampered_signature_fails_with_malformed() {
        let signer = signer();
        let token = signer.issue(&UserId::random()).expect("token issues");
        // Flip the last signature character to another base64url symbol.
        let mut tampered: String = token.chars().take(token.len() - 1).collect();
        tampered.push(if token.ends_with('A') { 'B' } else { 'A' });
        assert_eq!(signer.verify(&tampered), Err(AuthTokenError::Malformed));
    }

    #[test]
    fn foreign_key_fails_with_malformed() {
        let token = signer().issue(&UserId::random()).expect("token issues");
        let other = TokenSigner::new(&SigningKey::generate());
        assert_eq!(other.verify(&token), Err(AuthTokenError::Malformed));
    }

    #[rstest]
    #[case("")]
    #[case("garbage")]
    #[case("a.b.c")]
    fn unparseable_tokens_fail_with_malformed(#[case] token: &str) {
        assert_eq!(signer().verify(token), Err(AuthTokenError::Malformed));
    }

    #[test]
    fn missing_subject_fails_with_missing_subject() {
        let key = SigningKey::from_bytes(&b"test-signing-key-32-bytes-long!!"[..]);
        let signer = TokenSigner::new(&key);
        let claims = serde_json::json!({
            "iat": Utc::now().timestamp(),
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .expect("token issues");
        assert_eq!(signer.verify(&token), Err(AuthTokenError::MissingSubject));
    }

    #[test]
    fn non_uuid_subject_fails_with_malformed() {
        let key = SigningKey::from_bytes(&b"test-signing-key-32-bytes-long!!"[..]);
        let signer = TokenSigner::new(&key);
        let claims = serde_json::json!({
            "sub": "not-a-uuid",
            "exp": (Utc::now() + Duration::hours(1)).timestamp(),
        });
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(key.as_bytes()),
        )
        .expect("token issues");
        assert_eq!(signer.verify(&token), Err(AuthTokenError::Malformed));
    }
}
