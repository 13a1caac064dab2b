//! Budget API handlers.
//!
//! ```text
//! POST /api/budget {"category":"Groceries","monthly_limit":200.0,"month":6,"year":2024}
//! GET /api/budget
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::ports::BudgetPersistenceError;
use crate::domain::{Budget, BudgetDraft, BudgetValidationError, Category, Error};
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Budget upsert request body.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BudgetRequest {
    pub category: String,
    pub monthly_limit: f64,
    /// Calendar month, 1 through 12.
    pub month: u32,
    pub year: i32,
}

/// Public view of a stored budget.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct BudgetResponse {
    pub id: String,
    pub category: String,
    pub monthly_limit: f64,
    pub month: u32,
    pub year: i32,
    pub created_at: String,
}

impl From<&Budget> for BudgetResponse {
    fn from(budget: &Budget) -> Self {
        Self {
            id: budget.id().to_string(),
            category: budget.category().to_string(),
            monthly_limit: budget.monthly_limit(),
            month: budget.month(),
            year: budget.year(),
            created_at: budget.created_at().to_rfc3339(),
        }
    }
}

fn map_validation_error(err: BudgetValidationError) -> Error {
    let field = match err {
        BudgetValidationError::NonFiniteLimit | BudgetValidationError::NegativeLimit { .. } => {
            "monthly_limit"
        }
        BudgetValidationError::MonthOutOfRange { .. } => "month",
        BudgetValidationError::YearOutOfRange { .. } => "year",
    };
    Error::invalid_request(err.to_string()).with_details(json!({ "field": field }))
}

fn store_unavailable(error: BudgetPersistenceError) -> Error {
    tracing::error!(%error, "budget store operation failed");
    Error::service_unavailable("budget store unavailable")
}

/// Set the acting user's budget for a category and month, replacing any
/// previous limit for the same key.
#[utoipa::path(
    post,
    path = "/api/budget",
    request_body = BudgetRequest,
    responses(
        (status = 200, description = "Budget stored", body = BudgetResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Budget store unavailable", body = Error)
    ),
    tags = ["budget"],
    operation_id = "setBudget"
)]
#[post("/budget")]
pub async fn set_budget(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
    payload: web::Json<BudgetRequest>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let category = Category::new(body.category)
        .map_err(|err| Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "category" })))?;
    let draft = BudgetDraft::new(category, body.monthly_limit, body.month, body.year)
        .map_err(map_validation_error)?;

    let stored = state
        .budgets
        .upsert(user.id(), draft)
        .await
        .map_err(store_unavailable)?;
    Ok(HttpResponse::Ok().json(BudgetResponse::from(&stored)))
}

/// List the acting user's budgets.
#[utoipa::path(
    get,
    path = "/api/budget",
    responses(
        (status = 200, description = "Budgets", body = [BudgetResponse]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Budget store unavailable", body = Error)
    ),
    tags = ["budget"],
    operation_id = "listBudgets"
)]
#[get("/budget")]
pub async fn list_budgets(
    user: AuthenticatedUser,
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<BudgetResponse>>> {
    let budgets = state
        .budgets
        .list(user.id())
        .await
        .map_err(store_unavailable)?;
    Ok(web::Json(budgets.iter().map(BudgetResponse::from).collect()))
}
