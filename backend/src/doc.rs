//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], which generates the OpenAPI specification for the REST
//! API: every endpoint path, the request/response schemas, and the bearer
//! token security scheme. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{AnalyticsSummary, CategorySummary, Error, ErrorCode, MonthlyTotal};
use crate::inbound::http::accounts::{
    LoginRequest, RegisterRequest, TokenResponse, UserResponse,
};
use crate::inbound::http::budgets::{BudgetRequest, BudgetResponse};
use crate::inbound::http::expenses::{ExpenseRequest, ExpenseResponse};

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some(
                        "Bearer token issued by POST /api/auth/register or /api/auth/login.",
                    ))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Expense tracker API",
        description = "HTTP interface for token-authenticated expense tracking, \
                       budgets, and spending analytics."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::expenses::create_expense,
        crate::inbound::http::expenses::list_expenses,
        crate::inbound::http::expenses::get_expense,
        crate::inbound::http::expenses::update_expense,
        crate::inbound::http::expenses::delete_expense,
        crate::inbound::http::analytics::summary,
        crate::inbound::http::budgets::set_budget,
        crate::inbound::http::budgets::list_budgets,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        RegisterRequest,
        LoginRequest,
        TokenResponse,
        UserResponse,
        ExpenseRequest,
        ExpenseResponse,
        BudgetRequest,
        BudgetResponse,
        AnalyticsSummary,
        CategorySummary,
        MonthlyTotal,
        Error,
        ErrorCode,
    )),
    tags(
        (name = "auth", description = "Registration and login"),
        (name = "expenses", description = "Expense record management"),
        (name = "analytics", description = "Spending summaries"),
        (name = "budget", description = "Monthly category budgets"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
