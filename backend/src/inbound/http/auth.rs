//! Bearer-token request extractor.
//!
//! Every data route takes an [`AuthenticatedUser`] argument; extraction
//! failing short-circuits the handler with a 401 before any business logic
//! runs. The distinct failure messages ("missing bearer token", "invalid
//! token", "token expired") let clients tell a missing header from a stale
//! credential.

use std::future::{ready, Ready};

use actix_web::{dev::Payload, web, FromRequest, HttpRequest};

use crate::domain::{Error, TokenSigner, UserId};

/// The identity extracted from a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(UserId);

impl AuthenticatedUser {
    /// The acting user's identifier.
    #[must_use]
    pub fn id(&self) -> &UserId {
        &self.0
    }

    /// Consume the extractor, yielding the identifier.
    #[must_use]
    pub fn into_id(self) -> UserId {
        self.0
    }
}

fn bearer_token(req: &HttpRequest) -> Result<&str, Error> {
    let header = req
        .headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    let value = header
        .to_str()
        .map_err(|_| Error::unauthorized("missing bearer token"))?;
    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| Error::unauthorized("missing bearer token"))
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, Error> {
    let token = bearer_token(req)?;
    let signer = req
        .app_data::<web::Data<TokenSigner>>()
        .ok_or_else(|| Error::internal("token signer not configured"))?;
    let user = signer
        .verify(token)
        .map_err(|error| Error::unauthorized(error.to_string()))?;
    Ok(AuthenticatedUser(user))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::test::TestRequest;
    use chrono::Duration;
    use rstest::rstest;

    use crate::domain::SigningKey;

    fn signer() -> TokenSigner {
        TokenSigner::new(&SigningKey::from_bytes(&b"test-signing-key-32-bytes-long!!"[..]))
    }

    fn request_with(signer: &TokenSigner, header: Option<&str>) -> HttpRequest {
        let mut builder = TestRequest::default().app_data(web::Data::new(signer.clone()));
        if let Some(value) = header {
            builder = builder.insert_header(("Authorization", value));
        }
        builder.to_http_request()
    }

    #[test]
    fn valid_token_extracts_the_user() {
        let signer = signer();
        let user = UserId::random();
        let token = signer.issue(&user).expect("token issues");
        let req = request_with(&signer, Some(&format!("Bearer {token}")));

        let extracted = authenticate(&req).expect("extraction succeeds");
        assert_eq!(extracted.id(), &user);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer "))]
    #[case(Some("Basic dXNlcjpwdw=="))]
    fn missing_or_non_bearer_credentials_are_rejected(#[case] header: Option<&str>) {
        let signer = signer();
        let err = authenticate(&request_with(&signer, header)).expect_err("must fail");
        assert_eq!(err.message, "missing bearer token");
    }

    #[test]
    fn garbage_token_reports_invalid() {
        let signer = signer();
        let err = authenticate(&request_with(&signer, Some("Bearer not-a-jwt")))
            .expect_err("must fail");
        assert_eq!(err.message, "invalid token");
    }

    #[test]
    fn expired_token_reports_expired() {
        let signer = signer();
        let token = signer
            .issue_with_lifetime(&UserId::random(), Duration::days(-1))
            .expect("token issues");
        let err = authenticate(&request_with(&signer, Some(&format!("Bearer {token}"))))
            .expect_err("must fail");
        assert_eq!(err.message, "token expired");
    }
}
