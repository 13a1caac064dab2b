//! Account API handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.com","password":"s3cret"}
//! POST /api/auth/login {"email":"ada@example.com","password":"s3cret"}
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AuthenticatedAccount, CredentialValidationError, Error, LoginCredentials,
    RegistrationDetails, User,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request body for `POST /api/auth/login`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of an account, never including the password hash.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().to_string(),
            name: user.name().to_owned(),
            email: user.email().to_string(),
            created_at: user.created_at().to_rfc3339(),
        }
    }
}

/// Successful register/login response.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
    pub user: UserResponse,
}

impl From<AuthenticatedAccount> for TokenResponse {
    fn from(account: AuthenticatedAccount) -> Self {
        Self {
            user: UserResponse::from(&account.user),
            token: account.token,
        }
    }
}

/// Create an account and return its first bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Account created", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let details = RegistrationDetails::try_from_parts(&body.name, &body.email, &body.password)
        .map_err(map_credential_validation_error)?;
    let account = state.accounts.register(&details).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(account)))
}

/// Exchange credentials for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "User store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let credentials = LoginCredentials::try_from_parts(&body.email, &body.password)
        .map_err(map_credential_validation_error)?;
    let account = state.accounts.login(&credentials).await?;
    Ok(HttpResponse::Ok().json(TokenResponse::from(account)))
}

fn map_credential_validation_error(err: CredentialValidationError) -> Error {
    let field = match err {
        CredentialValidationError::InvalidEmail => "email",
        CredentialValidationError::EmptyPassword => "password",
        CredentialValidationError::EmptyName | CredentialValidationError::NameTooLong { .. } => {
            "name"
        }
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use actix_web::{http::StatusCode, test as actix_test, App};
    use rstest::rstest;
    use serde_json::Value;

    use crate::server::fixture_state;
    use crate::domain::{SigningKey, TokenSigner};

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let signer = TokenSigner::new(&SigningKey::generate());
        let state = fixture_state(&signer);
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::Data::new(signer))
            .service(web::scope("/api").service(register).service(login))
    }

    #[actix_web::test]
    async fn register_then_login_returns_tokens() {
        let app = actix_test::init_service(test_app()).await;

        let register_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(&RegisterRequest {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    password: "s3cret".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(register_res.status(), StatusCode::OK);
        let body: Value =
            serde_json::from_slice(&actix_test::read_body(register_res).await)
                .expect("response JSON");
        assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
        assert_eq!(body["user"]["email"], "ada@example.com");
        assert!(body["user"].get("password_hash").is_none());

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(&LoginRequest {
                    email: "ada@example.com".into(),
                    password: "s3cret".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(login_res.status(), StatusCode::OK);
    }

    #[rstest]
    #[case("", "ada@example.com", "pw", "name")]
    #[case("Ada", "not-an-email", "pw", "email")]
    #[case("Ada", "ada@example.com", "", "password")]
    #[actix_web::test]
    async fn register_rejects_invalid_payloads(
        #[case] name: &str,
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(&RegisterRequest {
                    name: name.into(),
                    email: email.into(),
                    password: password.into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&actix_test::read_body(response).await)
            .expect("error payload");
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["field"], field);
    }

    #[actix_web::test]
    async fn duplicate_registration_is_rejected() {
        let app = actix_test::init_service(test_app()).await;
        let request = || {
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(&RegisterRequest {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    password: "s3cret".into(),
                })
                .to_request()
        };
        let first = actix_test::call_service(&app, request()).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = actix_test::call_service(&app, request()).await;
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body: Value = serde_json::from_slice(&actix_test::read_body(second).await)
            .expect("error payload");
        assert_eq!(body["message"], "email already registered");
    }

    #[actix_web::test]
    async fn login_with_wrong_password_is_unauthorized() {
        let app = actix_test::init_service(test_app()).await;
        actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(&RegisterRequest {
                    name: "Ada".into(),
                    email: "ada@example.com".into(),
                    password: "s3cret".into(),
                })
                .to_request(),
        )
        .await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(&LoginRequest {
                    email: "ada@example.com".into(),
                    password: "wrong".into(),
                })
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = serde_json::from_slice(&actix_test::read_body(response).await)
            .expect("error payload");
        assert_eq!(body["message"], "invalid email or password");
    }
}
